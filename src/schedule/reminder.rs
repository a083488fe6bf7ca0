//! WhatsApp reminder links
//!
//! A `wa.me` link opens a chat with the message prefilled; nothing is sent
//! until the business owner presses send.

use crate::entities::Appointment;

/// Keep only the digits of a phone number, as `wa.me` expects
pub fn phone_digits(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

pub fn reminder_message(customer_name: &str, date: &str, time: &str) -> String {
    format!(
        "Hi {}! This is a reminder for your appointment on {} at {}. Please confirm or reschedule if needed.",
        customer_name, date, time
    )
}

pub fn whatsapp_reminder_link(phone: &str, customer_name: &str, date: &str, time: &str) -> String {
    format!(
        "https://wa.me/{}?text={}",
        phone_digits(phone),
        urlencoding::encode(&reminder_message(customer_name, date, time))
    )
}

impl Appointment {
    pub fn reminder_link(&self) -> String {
        whatsapp_reminder_link(&self.phone, &self.customer_name, &self.date, &self.time)
    }
}
