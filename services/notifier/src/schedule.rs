//! Daily wall-clock schedule in a named timezone
//!
//! Occurrences come from a cron expression (`<s> <m> <h> * * *`) evaluated
//! in the configured zone, so DST transitions follow the cron engine's rules.

use std::fmt;

use chrono::{DateTime, Duration, NaiveTime, SubsecRound, Timelike, Utc};
use chrono_tz::Tz;
use croner::Cron;
use tracing::warn;

use crate::error::{NotifyError, NotifyResult};

/// One firing per calendar day at a fixed local time
pub struct DailySchedule {
    at: NaiveTime,
    tz: Tz,
    cron: Cron,
}

impl DailySchedule {
    pub fn new(at: NaiveTime, tz: Tz) -> NotifyResult<Self> {
        let pattern = format!("{} {} {} * * *", at.second(), at.minute(), at.hour());
        let cron = Cron::new(&pattern)
            .with_seconds_required()
            .parse()
            .map_err(|e| {
                NotifyError::Configuration(format!("Invalid daily schedule {pattern}: {e}"))
            })?;

        Ok(Self { at, tz, cron })
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// First occurrence strictly after `instant`
    pub fn next_after(&self, instant: DateTime<Utc>) -> DateTime<Utc> {
        // the cron engine works in whole seconds
        let local = instant.trunc_subsecs(0).with_timezone(&self.tz);

        match self.cron.find_next_occurrence(&local, false) {
            Ok(next) => next.with_timezone(&Utc),
            Err(e) => {
                warn!(error = %e, at = %self.at, "No upcoming occurrence, retrying in a day");
                instant + Duration::days(1)
            }
        }
    }
}

impl fmt::Debug for DailySchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DailySchedule")
            .field("at", &self.at)
            .field("tz", &self.tz)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn nine_eastern() -> DailySchedule {
        DailySchedule::new(NaiveTime::from_hms_opt(9, 0, 0).unwrap(), chrono_tz::US::Eastern)
            .unwrap()
    }

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn before_nine_is_same_day() {
        // 08:59:59 EDT
        let next = nine_eastern().next_after(utc(2024, 7, 1, 12, 59, 59));
        assert_eq!(next, utc(2024, 7, 1, 13, 0, 0));

        // sub-second remainder before nine still lands on nine
        let next = nine_eastern()
            .next_after(utc(2024, 7, 1, 12, 59, 59) + Duration::milliseconds(900));
        assert_eq!(next, utc(2024, 7, 1, 13, 0, 0));
    }

    #[test]
    fn at_or_after_nine_is_next_day() {
        let schedule = nine_eastern();
        assert_eq!(
            schedule.next_after(utc(2024, 7, 1, 13, 0, 0)),
            utc(2024, 7, 2, 13, 0, 0)
        );
        assert_eq!(
            schedule.next_after(utc(2024, 7, 1, 13, 0, 0) + Duration::milliseconds(400)),
            utc(2024, 7, 2, 13, 0, 0)
        );
        assert_eq!(
            schedule.next_after(utc(2024, 7, 1, 20, 0, 0)),
            utc(2024, 7, 2, 13, 0, 0)
        );
    }

    #[test]
    fn follows_daylight_saving() {
        let schedule = nine_eastern();
        // winter: 09:00 EST = 14:00 UTC
        assert_eq!(
            schedule.next_after(utc(2024, 1, 15, 0, 0, 0)),
            utc(2024, 1, 15, 14, 0, 0)
        );
        // spring forward on 2024-03-10
        assert_eq!(
            schedule.next_after(utc(2024, 3, 9, 15, 0, 0)),
            utc(2024, 3, 10, 13, 0, 0)
        );
        // fall back on 2024-11-03
        assert_eq!(
            schedule.next_after(utc(2024, 11, 2, 14, 0, 0)),
            utc(2024, 11, 3, 14, 0, 0)
        );
    }

    #[test]
    fn nonexistent_local_time_still_moves_forward() {
        let schedule = DailySchedule::new(
            NaiveTime::from_hms_opt(2, 30, 0).unwrap(),
            chrono_tz::US::Eastern,
        )
        .unwrap();
        // 02:30 does not exist on 2024-03-10
        let start = utc(2024, 3, 9, 12, 0, 0);
        let next = schedule.next_after(start);
        assert!(next > start);
        assert!(next <= utc(2024, 3, 11, 6, 30, 0));
    }

    #[test]
    fn local_date_is_used_not_utc_date() {
        // 2024-07-02 02:00 UTC is still 2024-07-01 22:00 EDT
        let next = nine_eastern().next_after(utc(2024, 7, 2, 2, 0, 0));
        assert_eq!(next, utc(2024, 7, 2, 13, 0, 0));
    }

    #[test]
    fn seconds_are_part_of_the_time() {
        let schedule = DailySchedule::new(
            NaiveTime::from_hms_opt(9, 0, 30).unwrap(),
            chrono_tz::US::Eastern,
        )
        .unwrap();
        assert_eq!(
            schedule.next_after(utc(2024, 7, 1, 13, 0, 0)),
            utc(2024, 7, 1, 13, 0, 30)
        );
    }
}
