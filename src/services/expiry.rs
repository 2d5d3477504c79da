//! The daily-expiry rule shared by the cleanup job and the read paths.
//!
//! A dated row (daily menu, menu reservation) is *current* only on the exact
//! calendar day it carries. There is no grace period: any other date, past or
//! future, is expired.

use chrono::{NaiveDate, Utc};

/// Rows whose lifetime is a single calendar day.
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

/// The reference day: the UTC calendar date of the executing clock.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

pub fn is_current(date: NaiveDate, today: NaiveDate) -> bool {
    date == today
}

#[derive(Debug)]
pub struct Partition<T> {
    pub current: Vec<T>,
    pub expired: Vec<T>,
}

pub fn partition<T: Dated>(rows: impl IntoIterator<Item = T>, today: NaiveDate) -> Partition<T> {
    let (current, expired): (Vec<T>, Vec<T>) = rows
        .into_iter()
        .partition(|row| is_current(row.date(), today));
    Partition { current, expired }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row(NaiveDate);

    impl Dated for Row {
        fn date(&self) -> NaiveDate {
            self.0
        }
    }

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn rows(counts: &[(&str, usize)]) -> Vec<Row> {
        counts.iter()
            .flat_map(|(d, n)| std::iter::repeat(Row(day(d))).take(*n))
            .collect()
    }

    /// In-memory equivalent of one cleanup pass over a table.
    fn cleanup(table: &mut Vec<Row>, today: NaiveDate) -> usize {
        let Partition { current, expired } = partition(std::mem::take(table), today);
        *table = current;
        expired.len()
    }

    #[test]
    fn only_the_exact_day_is_current() {
        let today = day("2025-06-02");
        assert!(is_current(today, today));
        assert!(!is_current(day("2025-06-01"), today));
        assert!(!is_current(day("2025-06-03"), today));
    }

    #[test]
    fn cleanup_example_from_two_days_of_menus() {
        let today = day("2025-06-02");
        let mut menus = rows(&[("2025-06-01", 3), ("2025-06-02", 2)]);

        assert_eq!(cleanup(&mut menus, today), 3);
        assert_eq!(menus.len(), 2);
        assert!(menus.iter().all(|m| m.date() == today));
    }

    #[test]
    fn second_cleanup_deletes_nothing() {
        let today = day("2025-06-02");
        let mut menus = rows(&[("2025-05-30", 1), ("2025-06-02", 4), ("2025-06-05", 2)]);
        let mut reservations = rows(&[("2025-06-01", 7), ("2025-06-02", 1)]);

        assert_eq!(cleanup(&mut menus, today), 3);
        assert_eq!(cleanup(&mut reservations, today), 7);

        assert_eq!(cleanup(&mut menus, today), 0);
        assert_eq!(cleanup(&mut reservations, today), 0);
        assert!(menus.iter().chain(&reservations).all(|r| r.date() == today));
    }

    #[test]
    fn future_dates_are_expired_too() {
        let today = day("2025-06-02");
        let p = partition(rows(&[("2025-06-03", 2)]), today);
        assert!(p.current.is_empty());
        assert_eq!(p.expired.len(), 2);
    }

    #[test]
    fn empty_input() {
        let p = partition(Vec::<Row>::new(), day("2025-06-02"));
        assert!(p.current.is_empty() && p.expired.is_empty());
    }
}
