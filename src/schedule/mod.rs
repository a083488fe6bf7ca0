//! Appointment list views and reminder links

pub mod aggregate;
pub mod reminder;

pub use aggregate::{
    DateGroup, DayCount, FilterMode, appointments_on, calendar_strip, counts_by_date, date_key,
    filter_by_mode, group_by_date, sort_chronological, today_utc, week_window,
};
pub use reminder::whatsapp_reminder_link;
