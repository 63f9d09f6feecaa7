use std::fmt::Display;

use chrono::{DateTime, TimeZone, Utc};

pub fn format_time_of_day<Tz>(datetime: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    datetime.with_timezone(tz).format("%H:%M:%S").to_string()
}

/// Time of day in the user's locale and timezone.
#[cfg(target_arch = "wasm32")]
pub fn display_time(datetime: DateTime<Utc>) -> String {
    use wasm_bindgen::JsValue;

    let locale = web_sys::window()
        .and_then(|window| window.navigator().language())
        .unwrap_or_else(|| "en-US".to_string());

    #[expect(clippy::cast_precision_loss)]
    let date = js_sys::Date::new(&JsValue::from_f64(datetime.timestamp_millis() as f64));

    date.to_locale_time_string(&locale).into()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn display_time(datetime: DateTime<Utc>) -> String {
    format_time_of_day(datetime, &chrono::Local)
}

#[cfg(test)]
mod tests {
    use chrono::FixedOffset;

    use super::*;

    #[test]
    fn time_of_day_uses_target_timezone() {
        let datetime = Utc.with_ymd_and_hms(2024, 5, 2, 23, 30, 5).unwrap();
        let Some(tokyo) = FixedOffset::east_opt(9 * 3600) else {
            panic!("valid offset");
        };

        assert_eq!(format_time_of_day(datetime, &Utc), "23:30:05");
        assert_eq!(format_time_of_day(datetime, &tokyo), "08:30:05");
    }
}
