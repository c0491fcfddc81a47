use crate::DateError;
use oxsdatatypes::{DayTimeDuration, Decimal, Double};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The time zone of a [Date].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeZone {
    /// The value does not carry a time zone.
    None,
    /// The value is in UTC (written as `Z`).
    Z,
    /// An offset in hours from UTC.
    Hours(i8),
}

/// A calendar date with an optional time of day.
///
/// A month of `0` indicates an `xsd:gYear`, a day of `0` an `xsd:gYearMonth` and an hour of `-1`
/// a value without a time (`xsd:date`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Date {
    year: i64,
    month: u8,
    day: u8,
    hour: i8,
    minute: u8,
    second: f64,
    timezone: TimeZone,
}

const MIN_YEAR: i64 = -9999;
const MAX_YEAR: i64 = 9999;
const SECOND_MULTIPLIER: f64 = 1024.0;
const MIN_TIME_ZONE: i8 = -23;
const MAX_TIME_ZONE: i8 = 23;

const BITS_TIME_ZONE: u32 = 6;
const BITS_SECOND: u32 = 16;
const BITS_MINUTE: u32 = 6;
const BITS_HOUR: u32 = 5;
const BITS_DAY: u32 = 5;
const BITS_MONTH: u32 = 4;
const BITS_YEAR: u32 = 15;

const SHIFT_SECOND: u32 = BITS_TIME_ZONE;
const SHIFT_MINUTE: u32 = SHIFT_SECOND + BITS_SECOND;
const SHIFT_HOUR: u32 = SHIFT_MINUTE + BITS_MINUTE;
const SHIFT_DAY: u32 = SHIFT_HOUR + BITS_HOUR;
const SHIFT_MONTH: u32 = SHIFT_DAY + BITS_DAY;
const SHIFT_YEAR: u32 = SHIFT_MONTH + BITS_MONTH;
const NUM_DATE_BITS: u32 = SHIFT_YEAR + BITS_YEAR;

impl Date {
    /// Creates a new [Date] and validates all components.
    pub fn try_new(
        year: i64,
        month: u8,
        day: u8,
        hour: i8,
        minute: u8,
        second: f64,
        timezone: TimeZone,
    ) -> Result<Self, DateError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(DateError::YearOutOfRange(year));
        }
        check_field("month", i64::from(month), 0, 12)?;
        check_field("day", i64::from(day), 0, 31)?;
        check_field("hour", i64::from(hour), -1, 23)?;
        check_field("minute", i64::from(minute), 0, 59)?;
        if !(0.0..60.0).contains(&second) {
            #[allow(clippy::cast_possible_truncation)]
            let value = second as i64;
            return Err(DateError::FieldOutOfRange {
                field: "second",
                value,
            });
        }
        if let TimeZone::Hours(hours) = timezone {
            check_field(
                "time zone",
                i64::from(hours),
                i64::from(MIN_TIME_ZONE),
                i64::from(MAX_TIME_ZONE),
            )?;
        }
        Ok(Self {
            year,
            month,
            day,
            hour,
            minute,
            second,
            timezone,
        })
    }

    /// Creates an `xsd:gYear`.
    pub fn from_year(year: i64) -> Result<Self, DateError> {
        Self::try_new(year, 0, 0, -1, 0, 0.0, TimeZone::None)
    }

    /// Creates an `xsd:gYearMonth`.
    pub fn from_year_month(year: i64, month: u8) -> Result<Self, DateError> {
        check_field("month", i64::from(month), 1, 12)?;
        Self::try_new(year, month, 0, -1, 0, 0.0, TimeZone::None)
    }

    /// Creates an `xsd:date`.
    pub fn from_ymd(year: i64, month: u8, day: u8) -> Result<Self, DateError> {
        check_field("month", i64::from(month), 1, 12)?;
        check_field("day", i64::from(day), 1, 31)?;
        Self::try_new(year, month, day, -1, 0, 0.0, TimeZone::None)
    }

    /// Returns the same date with the given time of day.
    pub fn with_time(
        self,
        hour: u8,
        minute: u8,
        second: f64,
        timezone: TimeZone,
    ) -> Result<Self, DateError> {
        let hour = i8::try_from(hour).map_err(|_| DateError::FieldOutOfRange {
            field: "hour",
            value: i64::from(hour),
        })?;
        Self::try_new(
            self.year,
            self.month,
            self.day,
            hour,
            minute,
            second,
            timezone,
        )
    }

    pub fn year(&self) -> i64 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    /// Returns the hour or [None] if the value has no time of day.
    pub fn hour(&self) -> Option<u8> {
        u8::try_from(self.hour).ok()
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    /// Returns the seconds. The value is stored with a precision of 1/1024 seconds.
    pub fn second(&self) -> f64 {
        self.second
    }

    pub fn timezone(&self) -> TimeZone {
        self.timezone
    }

    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    fn to_bits(self) -> u64 {
        let year = (self.year - MIN_YEAR) as u64;
        let hour = (i64::from(self.hour) + 1) as u64;
        let second = (self.second * SECOND_MULTIPLIER).round() as u64;
        let timezone = match self.timezone {
            TimeZone::None => 0,
            TimeZone::Z => 1,
            TimeZone::Hours(hours) => (i64::from(hours) - i64::from(MIN_TIME_ZONE) + 2) as u64,
        };
        (year << SHIFT_YEAR)
            | (u64::from(self.month) << SHIFT_MONTH)
            | (u64::from(self.day) << SHIFT_DAY)
            | (hour << SHIFT_HOUR)
            | (u64::from(self.minute) << SHIFT_MINUTE)
            | (second << SHIFT_SECOND)
            | timezone
    }

    #[allow(
        clippy::cast_possible_wrap,
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss
    )]
    fn from_bits(bits: u64) -> Self {
        let field = |shift: u32, width: u32| (bits >> shift) & ((1 << width) - 1);
        let timezone = match field(0, BITS_TIME_ZONE) {
            0 => TimeZone::None,
            1 => TimeZone::Z,
            value => TimeZone::Hours((value as i64 - 2 + i64::from(MIN_TIME_ZONE)) as i8),
        };
        Self {
            year: field(SHIFT_YEAR, BITS_YEAR) as i64 + MIN_YEAR,
            month: field(SHIFT_MONTH, BITS_MONTH) as u8,
            day: field(SHIFT_DAY, BITS_DAY) as u8,
            hour: (field(SHIFT_HOUR, BITS_HOUR) as i64 - 1) as i8,
            minute: field(SHIFT_MINUTE, BITS_MINUTE) as u8,
            second: field(SHIFT_SECOND, BITS_SECOND) as f64 / SECOND_MULTIPLIER,
            timezone,
        }
    }
}

fn check_field(field: &'static str, value: i64, min: i64, max: i64) -> Result<(), DateError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(DateError::FieldOutOfRange { field, value })
    }
}

impl Display for Date {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.year < 0 {
            f.write_str("-")?;
        }
        write!(f, "{:04}", self.year.unsigned_abs())?;
        if self.month == 0 {
            return Ok(());
        }
        write!(f, "-{:02}", self.month)?;
        if self.day == 0 {
            return Ok(());
        }
        write!(f, "-{:02}", self.day)?;
        if let Some(hour) = self.hour() {
            write!(f, "T{hour:02}:{:02}:{:02}", self.minute, self.second)?;
        }
        match self.timezone {
            TimeZone::None => Ok(()),
            TimeZone::Z => f.write_str("Z"),
            TimeZone::Hours(hours) => write!(f, "{hours:+03}:00"),
        }
    }
}

/// Either a [Date] or a day-time duration, packed into 60 bits.
///
/// Dates sort before durations. Dates are ordered by their components (year first), durations
/// by their length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DateYearOrDuration(u64);

const DURATION_FLAG: u64 = 1 << 59;
const DURATION_BIAS: i64 = 1 << 58;

impl DateYearOrDuration {
    pub fn from_date(date: Date) -> Self {
        Self(date.to_bits())
    }

    /// Creates a duration of `millis` milliseconds.
    pub fn from_duration_millis(millis: i64) -> Result<Self, DateError> {
        if !(-DURATION_BIAS..DURATION_BIAS).contains(&millis) {
            return Err(DateError::DurationOutOfRange(millis));
        }
        #[allow(clippy::cast_sign_loss)]
        let biased = (millis + DURATION_BIAS) as u64;
        Ok(Self(DURATION_FLAG | biased))
    }

    /// Restores a value from the 60 payload bits of a [ValueId](crate::ValueId).
    pub fn from_bits(bits: u64) -> Self {
        Self(bits & (DURATION_FLAG | (DURATION_FLAG - 1)))
    }

    pub fn to_bits(self) -> u64 {
        self.0
    }

    pub fn is_duration(self) -> bool {
        self.0 & DURATION_FLAG != 0
    }

    pub fn is_date(self) -> bool {
        !self.is_duration()
    }

    /// Returns the date or [None] if this is a duration.
    pub fn date(self) -> Option<Date> {
        self.is_date().then(|| Date::from_bits(self.0))
    }

    /// Returns the length of the duration in milliseconds or [None] if this is a date.
    #[allow(clippy::cast_possible_wrap)]
    pub fn duration_millis(self) -> Option<i64> {
        self.is_duration()
            .then(|| (self.0 & (DURATION_FLAG - 1)) as i64 - DURATION_BIAS)
    }

    /// Parses an `xsd:date` like `2024-02-29` or `2024-02-29+02:00`.
    pub fn parse_xsd_date(lexical: &str) -> Result<Self, DateError> {
        let value = oxsdatatypes::Date::from_str(lexical).map_err(|_| parse_error(lexical))?;
        let date = Date::from_ymd(value.year(), value.month(), value.day())?;
        let date = Date {
            timezone: convert_timezone(value.timezone())?,
            ..date
        };
        Ok(Self::from_date(date))
    }

    /// Parses an `xsd:dateTime` like `2024-02-29T12:30:00Z`.
    pub fn parse_xsd_date_time(lexical: &str) -> Result<Self, DateError> {
        let value = oxsdatatypes::DateTime::from_str(lexical).map_err(|_| parse_error(lexical))?;
        let date = Date::from_ymd(value.year(), value.month(), value.day())?.with_time(
            value.hour(),
            value.minute(),
            decimal_to_f64(value.second()),
            convert_timezone(value.timezone())?,
        )?;
        Ok(Self::from_date(date))
    }

    /// Parses an `xsd:gYear` like `-0500`.
    pub fn parse_xsd_g_year(lexical: &str) -> Result<Self, DateError> {
        let value = oxsdatatypes::GYear::from_str(lexical).map_err(|_| parse_error(lexical))?;
        Ok(Self::from_date(Date::from_year(value.year())?))
    }

    /// Parses an `xsd:gYearMonth` like `2024-02`.
    pub fn parse_xsd_g_year_month(lexical: &str) -> Result<Self, DateError> {
        let value =
            oxsdatatypes::GYearMonth::from_str(lexical).map_err(|_| parse_error(lexical))?;
        Ok(Self::from_date(Date::from_year_month(
            value.year(),
            value.month(),
        )?))
    }

    /// Parses an `xsd:dayTimeDuration` like `P1DT2H`.
    pub fn parse_xsd_day_time_duration(lexical: &str) -> Result<Self, DateError> {
        let value = DayTimeDuration::from_str(lexical).map_err(|_| parse_error(lexical))?;
        let millis = duration_to_millis(value);
        let millis = i64::try_from(millis).unwrap_or(if millis < 0 { i64::MIN } else { i64::MAX });
        Self::from_duration_millis(millis)
    }
}

impl Display for DateYearOrDuration {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.date(), self.duration_millis()) {
            (Some(date), _) => write!(f, "{date}"),
            (None, Some(millis)) => {
                let sign = if millis < 0 { "-" } else { "" };
                let millis = millis.unsigned_abs();
                write!(f, "{sign}PT{}.{:03}S", millis / 1000, millis % 1000)
            }
            (None, None) => unreachable!("a value is either a date or a duration"),
        }
    }
}

fn parse_error(lexical: &str) -> DateError {
    DateError::Parse(lexical.to_owned())
}

fn decimal_to_f64(value: Decimal) -> f64 {
    f64::from(Double::from(value))
}

/// Computed with `i128`, as the components of a valid duration may exceed `i64` in milliseconds.
#[allow(clippy::cast_possible_truncation)]
fn duration_to_millis(value: DayTimeDuration) -> i128 {
    let whole = i128::from(value.days()) * 86_400_000
        + i128::from(value.hours()) * 3_600_000
        + i128::from(value.minutes()) * 60_000;
    whole + (decimal_to_f64(value.seconds()) * 1000.0).round() as i128
}

fn convert_timezone(timezone: Option<DayTimeDuration>) -> Result<TimeZone, DateError> {
    let Some(timezone) = timezone else {
        return Ok(TimeZone::None);
    };
    let minutes = timezone.minutes();
    if minutes != 0 {
        return Err(DateError::FieldOutOfRange {
            field: "time zone minute",
            value: minutes,
        });
    }
    let hours = timezone.hours();
    if hours == 0 {
        return Ok(TimeZone::Z);
    }
    check_field(
        "time zone",
        hours,
        i64::from(MIN_TIME_ZONE),
        i64::from(MAX_TIME_ZONE),
    )?;
    #[allow(clippy::cast_possible_truncation)]
    let hours = hours as i8;
    Ok(TimeZone::Hours(hours))
}
