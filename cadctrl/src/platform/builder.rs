use cadac::platform::Builder as ACPlatformBuilder;
use cadcore::{
    calendar::{
        parse_offset,
        Calendar,
        WeekStart,
    },
    completion::UncheckPolicy,
    platform::ConnectorOption,
};
use caddb::Backend;
use chrono::{
    FixedOffset,
    Offset,
    Utc,
};
use clap::{ArgAction, Parser};
use std::error::Error;

use super::Platform;

#[derive(Clone, Debug, Parser)]
pub struct Builder {
    #[clap(long, value_name = "CADENCE_DB_URL", env = "CADENCE_DB_URL")]
    pub cadence_db_url: String,
    #[clap(
        long,
        value_name = "CADENCE_AUTO_CREATE_DB",
        env = "CADENCE_AUTO_CREATE_DB",
        action = ArgAction::Set,
        default_value_t = true,
        default_missing_value = "true",
    )]
    pub cadence_auto_create_db: bool,
    #[clap(
        long,
        value_name = "CADENCE_UTC_OFFSET",
        env = "CADENCE_UTC_OFFSET",
        default_value = "+00:00",
        allow_hyphen_values = true,
        value_parser = parse_offset,
    )]
    pub cadence_utc_offset: FixedOffset,
    #[clap(
        long,
        value_name = "CADENCE_WEEK_START",
        env = "CADENCE_WEEK_START",
        value_enum,
        default_value_t = WeekStart::Sunday,
    )]
    pub cadence_week_start: WeekStart,
    #[clap(
        long,
        value_name = "CADENCE_UNCHECK_POLICY",
        env = "CADENCE_UNCHECK_POLICY",
        value_enum,
        default_value_t = UncheckPolicy::Asymmetric,
    )]
    pub cadence_uncheck_policy: UncheckPolicy,
    #[clap(
        long,
        value_name = "CADENCE_PASSWORD_AUTOPURGE",
        env = "CADENCE_PASSWORD_AUTOPURGE",
        action = ArgAction::Set,
        default_value_t = true,
        default_missing_value = "true",
    )]
    pub cadence_password_autopurge: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            cadence_db_url: String::new(),
            cadence_auto_create_db: true,
            cadence_utc_offset: Utc.fix(),
            cadence_week_start: WeekStart::Sunday,
            cadence_uncheck_policy: UncheckPolicy::Asymmetric,
            cadence_password_autopurge: true,
        }
    }
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cadence_db_url(mut self, value: String) -> Self {
        self.cadence_db_url = value;
        self
    }

    pub fn cadence_auto_create_db(mut self, value: bool) -> Self {
        self.cadence_auto_create_db = value;
        self
    }

    pub fn cadence_utc_offset(mut self, value: FixedOffset) -> Self {
        self.cadence_utc_offset = value;
        self
    }

    pub fn cadence_week_start(mut self, value: WeekStart) -> Self {
        self.cadence_week_start = value;
        self
    }

    pub fn cadence_uncheck_policy(mut self, value: UncheckPolicy) -> Self {
        self.cadence_uncheck_policy = value;
        self
    }

    pub fn cadence_password_autopurge(mut self, value: bool) -> Self {
        self.cadence_password_autopurge = value;
        self
    }

    pub fn calendar(&self) -> Calendar {
        Calendar::new(self.cadence_utc_offset, self.cadence_week_start)
    }

    pub async fn build(self) -> Result<Platform, Box<dyn Error + Send + Sync>> {
        let calendar = self.calendar();
        let (ac, tracking) = Backend::platforms(
            ConnectorOption::from(&self.cadence_db_url)
                .auto_create_db(self.cadence_auto_create_db)
        ).await?;
        Ok(Platform::new(
            ACPlatformBuilder::from_arc(ac)
                .password_autopurge(self.cadence_password_autopurge)
                .build(),
            tracking,
        )
            .with_calendar(calendar)
            .with_uncheck_policy(self.cadence_uncheck_policy))
    }
}
