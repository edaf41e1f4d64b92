//! Appointment calendar views

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::{Appointment, AppointmentStatus};

/// Appointments bucketed by (UTC) calendar day, each day in start order
pub fn group_by_day(appointments: &[Appointment]) -> BTreeMap<NaiveDate, Vec<Appointment>> {
    let mut days: BTreeMap<NaiveDate, Vec<Appointment>> = BTreeMap::new();
    for appointment in appointments {
        days.entry(appointment.date.date_naive())
            .or_default()
            .push(appointment.clone());
    }
    for day in days.values_mut() {
        day.sort_by_key(|a| a.date);
    }
    days
}

/// Non-cancelled appointments on `day`
pub fn for_day(appointments: &[Appointment], day: NaiveDate) -> Vec<Appointment> {
    let mut todays: Vec<Appointment> = appointments
        .iter()
        .filter(|a| a.status != AppointmentStatus::Cancelled && a.date.date_naive() == day)
        .cloned()
        .collect();
    todays.sort_by_key(|a| a.date);
    todays
}

/// Scheduled appointments starting at or after `now`, soonest first
pub fn upcoming(appointments: &[Appointment], now: DateTime<Utc>) -> Vec<Appointment> {
    let mut next: Vec<Appointment> = appointments
        .iter()
        .filter(|a| a.status == AppointmentStatus::Scheduled && a.date >= now)
        .cloned()
        .collect();
    next.sort_by_key(|a| a.date);
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppointmentDraft, Record};
    use chrono::TimeZone;

    fn at(day: u32, hour: u32, status: AppointmentStatus) -> Appointment {
        let date = Utc.with_ymd_and_hms(2026, 10, day, hour, 0, 0).unwrap();
        let mut draft = AppointmentDraft::new(format!("{}-{}", day, hour), date);
        draft.status = status;
        Appointment::from_draft(format!("a-{}-{}", day, hour), Utc::now(), draft)
    }

    #[test]
    fn test_group_by_day_sorted() {
        let appointments = vec![
            at(20, 15, AppointmentStatus::Scheduled),
            at(19, 18, AppointmentStatus::Scheduled),
            at(19, 9, AppointmentStatus::Completed),
        ];

        let days = group_by_day(&appointments);
        let keys: Vec<NaiveDate> = days.keys().copied().collect();
        assert_eq!(
            keys,
            vec![
                NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
                NaiveDate::from_ymd_opt(2026, 10, 20).unwrap(),
            ]
        );

        let nineteenth = &days[&keys[0]];
        assert_eq!(nineteenth[0].title, "19-9");
        assert_eq!(nineteenth[1].title, "19-18");
    }

    #[test]
    fn test_for_day_skips_cancelled() {
        let appointments = vec![
            at(19, 10, AppointmentStatus::Cancelled),
            at(19, 12, AppointmentStatus::Completed),
            at(20, 12, AppointmentStatus::Scheduled),
        ];
        let day = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();

        let todays = for_day(&appointments, day);
        assert_eq!(todays.len(), 1);
        assert_eq!(todays[0].title, "19-12");
    }

    #[test]
    fn test_upcoming() {
        let appointments = vec![
            at(21, 10, AppointmentStatus::Scheduled),
            at(18, 10, AppointmentStatus::Scheduled),
            at(20, 10, AppointmentStatus::Scheduled),
            at(22, 10, AppointmentStatus::Cancelled),
        ];
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 0, 0, 0).unwrap();

        let titles: Vec<String> = upcoming(&appointments, now).into_iter().map(|a| a.title).collect();
        assert_eq!(titles, vec!["20-10", "21-10"]);
    }
}
