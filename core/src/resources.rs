//! A handful of resource calls built on `FitbitClient::request`.
//!
//! Each method only normalizes its arguments and builds the
//! version-qualified path.

use crate::client::FitbitClient;
use crate::error::{ApiError, FitbitError};
use crate::interpret::Payload;
use crate::normalize::{
    format_date, format_time, require_end_date, require_start_date, DateArg, TimeArg,
};

impl FitbitClient {
    pub fn profile(&self) -> Result<Option<Payload>, FitbitError> {
        self.get(&self.user_path("1", "profile.json"))
    }

    /// Paired devices. The API returns an array, so the list is under `"body"`.
    pub fn devices(&self) -> Result<Option<Payload>, FitbitError> {
        self.get(&self.user_path("1", "devices.json"))
    }

    /// Daily activity summary.
    pub fn activities_on_date(
        &self,
        date: impl Into<DateArg>,
    ) -> Result<Option<Payload>, FitbitError> {
        let date = required_date(date)?;
        self.get(&self.user_path("1", &format!("activities/date/{date}.json")))
    }

    /// Sleep logs for a date. Served by API version 1.2.
    pub fn sleep_logs_on_date(
        &self,
        date: impl Into<DateArg>,
    ) -> Result<Option<Payload>, FitbitError> {
        let date = required_date(date)?;
        self.get(&self.user_path("1.2", &format!("sleep/date/{date}.json")))
    }

    /// Heart-rate time series between two dates, inclusive.
    pub fn heart_rate_series(
        &self,
        start_date: Option<&str>,
        end_date: Option<&str>,
    ) -> Result<Option<Payload>, FitbitError> {
        let start = required_date(require_start_date(start_date)?)?;
        let end = required_date(require_end_date(end_date)?)?;
        self.get(&self.user_path(
            "1",
            &format!("activities/heart/date/{start}/{end}.json"),
        ))
    }

    /// Log a body weight measurement. `time` may be absent.
    pub fn log_weight(
        &self,
        weight: f64,
        date: impl Into<DateArg>,
        time: impl Into<TimeArg>,
    ) -> Result<Option<Payload>, FitbitError> {
        let weight = weight.to_string();
        let date = required_date(date)?;
        let time = match time.into() {
            TimeArg::Absent => None,
            time => Some(format_time(time)?),
        };

        let mut params = vec![("weight", weight.as_str()), ("date", date.as_str())];
        if let Some(time) = time.as_deref() {
            params.push(("time", time));
        }
        self.post(&self.user_path("1", "body/log/weight.json"), &params)
    }

    pub fn delete_activity_log(&self, log_id: u64) -> Result<Option<Payload>, FitbitError> {
        self.delete(&self.user_path("1", &format!("activities/{log_id}.json")))
    }
}

fn required_date(date: impl Into<DateArg>) -> Result<String, ApiError> {
    format_date(date)?.ok_or_else(|| ApiError::InvalidArgument("date is required".to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};

    use crate::client::tests::client_with;
    use crate::error::ApiError;
    use crate::http::{HttpMethod, HttpResponse};

    #[test]
    fn sleep_uses_version_1_2() {
        let (client, transport) = client_with(HttpResponse::new(200, r#"{"sleep":[]}"#));
        client.sleep_logs_on_date("2024-03-15").unwrap();
        assert_eq!(
            transport.last().url,
            "https://api.fitbit.com/1.2/user/-/sleep/date/2024-03-15.json"
        );
    }

    #[test]
    fn activities_accept_typed_dates() {
        let (client, transport) = client_with(HttpResponse::new(200, "{}"));
        client
            .activities_on_date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
            .unwrap();
        assert_eq!(
            transport.last().url,
            "https://api.fitbit.com/1/user/-/activities/date/2024-01-02.json"
        );
    }

    #[test]
    fn bad_date_never_reaches_the_transport() {
        let (client, transport) = client_with(HttpResponse::new(200, "{}"));
        let err = client.activities_on_date("15/03/2024").unwrap_err();
        assert!(matches!(err.api(), Some(ApiError::InvalidDate(_))));
        assert!(transport.sent.lock().unwrap().is_empty());
    }

    #[test]
    fn heart_rate_series_requires_both_dates() {
        let (client, _) = client_with(HttpResponse::new(200, "{}"));
        let err = client.heart_rate_series(Some("2024-01-01"), None).unwrap_err();
        assert!(matches!(err.api(), Some(ApiError::InvalidArgument(m)) if m.contains("end_date")));

        let err = client.heart_rate_series(None, Some("2024-01-31")).unwrap_err();
        assert!(matches!(err.api(), Some(ApiError::InvalidArgument(m)) if m.contains("start_date")));
    }

    #[test]
    fn heart_rate_series_builds_range_path() {
        let (client, transport) = client_with(HttpResponse::new(200, "{}"));
        client
            .heart_rate_series(Some("2024-01-01"), Some("2024-01-31"))
            .unwrap();
        assert_eq!(
            transport.last().url,
            "https://api.fitbit.com/1/user/-/activities/heart/date/2024-01-01/2024-01-31.json"
        );
    }

    #[test]
    fn log_weight_posts_form() {
        let (client, transport) = client_with(HttpResponse::new(201, ""));
        let result = client
            .log_weight(72.5, "2024-03-15", NaiveTime::from_hms_opt(6, 5, 0).unwrap())
            .unwrap();
        assert_eq!(result, Some(Default::default()));

        let sent = transport.last();
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(sent.body.as_deref(), Some("weight=72.5&date=2024-03-15&time=06%3A05"));
    }

    #[test]
    fn log_weight_omits_absent_time() {
        let (client, transport) = client_with(HttpResponse::new(201, ""));
        client.log_weight(70.0, "2024-03-15", None::<&str>).unwrap();
        assert_eq!(transport.last().body.as_deref(), Some("weight=70&date=2024-03-15"));
    }

    #[test]
    fn log_weight_rejects_unpadded_time() {
        let (client, _) = client_with(HttpResponse::new(201, ""));
        let err = client.log_weight(70.0, "today", "6:05").unwrap_err();
        assert!(matches!(err.api(), Some(ApiError::InvalidTime(_))));
    }

    #[test]
    fn delete_activity_log_uses_delete() {
        let (client, transport) = client_with(HttpResponse::new(204, ""));
        assert_eq!(client.delete_activity_log(987).unwrap(), None);
        let sent = transport.last();
        assert_eq!(sent.method, HttpMethod::Delete);
        assert_eq!(sent.url, "https://api.fitbit.com/1/user/-/activities/987.json");
    }
}
