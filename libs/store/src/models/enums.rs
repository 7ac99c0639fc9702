//! Closed value sets used by enumerated columns
//!
//! Each enum round-trips through the exact string stored in the database and
//! sent over the wire. Parsing an unknown string fails with
//! [`DatabaseError::ConstraintViolation`].

use std::{fmt, str::FromStr};

use common::error::DatabaseError;
use serde::{Deserialize, Serialize};

macro_rules! closed_set {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant, )+
        }

        impl $name {
            /// Every member of the set, in declaration order
            pub const ALL: &'static [$name] = &[$( $name::$variant ),+];

            /// Stored representation
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $text, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok($name::$variant), )+
                    other => Err(DatabaseError::constraint(format!(
                        "Invalid {}: {}",
                        $label, other
                    ))),
                }
            }
        }
    };
}

closed_set! {
    /// Company size bracket
    EmployeeCount, "number of employees" {
        OneToTen => "1-10",
        ElevenToFifty => "11-50",
        FiftyOneToTwoHundred => "51-200",
        TwoHundredOneToFiveHundred => "201-500",
        FiveHundredOneToOneThousand => "501-1000",
        OneThousandOneToFiveThousand => "1001-5000",
        FiveThousandOneToTenThousand => "5001-10000",
        OverTenThousand => "10001+",
    }
}

closed_set! {
    /// Canadian province of residence
    Province, "province" {
        Alberta => "Alberta",
        BritishColumbia => "British Columbia",
        Manitoba => "Manitoba",
        NewBrunswick => "New Brunswick",
        NewfoundlandAndLabrador => "Newfoundland and Labrador",
        NovaScotia => "Nova Scotia",
        Ontario => "Ontario",
        PrinceEdwardIsland => "Prince Edward Island",
        Quebec => "Quebec",
        Saskatchewan => "Saskatchewan",
    }
}

closed_set! {
    /// Account recovery question
    SecurityQuestion, "security question" {
        MothersMaidenName => "What is your mother’s maiden name?",
        FirstPet => "What was the name of your first pet?",
        FirstCar => "What was the make of your first car?",
        FavoriteColor => "What is your favorite color?",
        BirthCity => "What city were you born in?",
    }
}

closed_set! {
    /// Billing plan
    Subscription, "subscription" {
        Free => "Free Tier",
        Business => "Business Tier",
        Enterprise => "Enterprise Tier",
    }
}

closed_set! {
    /// How often the user intends to reach out to a contact
    #[derive(Default)]
    Frequency, "frequency" {
        #[default]
        Weekly => "Weekly",
        Biweekly => "Biweekly",
        Monthly => "Monthly",
        Bimonthly => "Bimonthly",
        EveryThreeMonths => "Once_in_3_months",
        EverySixMonths => "Once_in_6_months",
    }
}

impl Frequency {
    /// Days between two expected interactions
    pub fn interval_days(self) -> i64 {
        match self {
            Frequency::Weekly => 7,
            Frequency::Biweekly => 14,
            Frequency::Monthly => 30,
            Frequency::Bimonthly => 60,
            Frequency::EveryThreeMonths => 91,
            Frequency::EverySixMonths => 182,
        }
    }
}

/// Render a closed set as an SQL `IN` list for `CHECK` constraints
pub(crate) fn sql_in_list(values: impl IntoIterator<Item = &'static str>) -> String {
    values
        .into_iter()
        .map(|v| format!("'{}'", v.replace('\'', "''")))
        .collect::<Vec<_>>()
        .join(", ")
}
