//! Date field state machine.
//!
//! [`DateField`] owns the visible text, the committed value and the picker's
//! [`ViewCursor`]. The host feeds it discrete [`FieldEvent`]s; each call to
//! [`DateField::handle`] runs to completion and returns at most one
//! [`FieldChange`] for the host to forward to its own `on_change`.
//!
//! Receiving a new external value never produces a change, so a host that
//! echoes changes back as values cannot loop.

use std::fmt;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::calendar::{self, MonthLayout};
use crate::consts::{
    DAYS_IN_WEEK, FARVARDIN, FULL_INPUT_DIGITS, GRID_ROWS, MAX_MONTH, MIN_YEAR, WEEKDAY_NAMES,
};
use crate::format::{digit_count, parse_jalali_input, sanitize_input};
use crate::{
    DateBounds, DateFieldConfig, ErrorKind, IsoDate, JalaliDate, Month, ParseError, RangeError,
};

/// Source of today's date, injected so tests can pin it.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Reads the local system date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Watches for clicks outside the field while the picker is open.
///
/// `watch` is called when the picker opens and `unwatch` exactly once after
/// it closes, including when the field is dropped with the picker open.
pub trait FocusObserver {
    fn watch(&mut self);
    fn unwatch(&mut self);
}

/// Observer for hosts that report outside clicks some other way.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopFocusObserver;

impl FocusObserver for NoopFocusObserver {
    fn watch(&mut self) {}
    fn unwatch(&mut self) {}
}

/// The Jalali year and month shown in the picker grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ViewCursor {
    pub year: i32,
    pub month: u8,
}

impl ViewCursor {
    /// Cursor showing the month of `date`
    pub const fn of(date: JalaliDate) -> Self {
        Self {
            year: date.year() as i32,
            month: date.month(),
        }
    }

    /// Moves by `months`, wrapping across years.
    /// Returns `None` if the result leaves the supported span.
    pub fn shifted(self, months: i32) -> Option<Self> {
        let total = self.year * i32::from(MAX_MONTH) + i32::from(self.month) - 1 + months;
        let year = total.div_euclid(i32::from(MAX_MONTH));
        let month = u8::try_from(total.rem_euclid(i32::from(MAX_MONTH)) + 1).ok()?;
        calendar::in_span(year).then_some(Self { year, month })
    }

    /// Number of days in the displayed month
    pub fn days(self) -> u8 {
        calendar::month_length(self.year, self.month)
    }
}

impl Default for ViewCursor {
    fn default() -> Self {
        Self {
            year: i32::from(MIN_YEAR),
            month: FARVARDIN,
        }
    }
}

impl fmt::Display for ViewCursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}", self.year, self.month)
    }
}

/// Text and commit state of the field. The picker is tracked separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldState {
    /// Nothing entered, no value
    Empty,
    /// Partial or unparsed text
    Typing { text: String, valid: bool },
    /// A parsed, in-bounds date
    Committed { iso: IsoDate, text: String },
}

/// Picker navigation actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Navigation {
    PrevMonth,
    NextMonth,
    PrevYear,
    NextYear,
    /// Show the current month without changing the selection
    Today,
}

/// Inputs to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEvent {
    /// The host set a new value; `None` for empty
    ValueChanged(Option<IsoDate>),
    /// The raw text content of the input after a keystroke or paste
    Input(String),
    Blur,
    OpenPicker,
    TogglePicker,
    ClosePicker,
    /// A click landed outside the field and picker
    OutsideClick,
    /// A day cell of the displayed month was clicked
    DayClicked(u8),
    Navigate(Navigation),
    Clear,
}

/// Notification for the host's `on_change`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldChange {
    Committed(IsoDate),
    Cleared,
}

impl FieldChange {
    /// The committed date, or `None` when cleared
    pub const fn value(self) -> Option<IsoDate> {
        match self {
            Self::Committed(iso) => Some(iso),
            Self::Cleared => None,
        }
    }
}

impl fmt::Display for FieldChange {
    /// Host-facing form: an ISO date or the empty string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Committed(iso) => write!(f, "{iso}"),
            Self::Cleared => Ok(()),
        }
    }
}

/// One day cell of the picker grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub day: u8,
    pub disabled: bool,
    pub selected: bool,
    pub today: bool,
}

/// The displayed month, Saturday-first rows of optional day cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    pub cursor: ViewCursor,
    pub cells: [[Option<GridCell>; DAYS_IN_WEEK]; GRID_ROWS],
}

impl MonthGrid {
    /// Header text, e.g. `Azar 1403`
    pub fn title(&self) -> String {
        Month::new(self.cursor.month)
            .map(|month| format!("{} {}", month.name(), self.cursor.year))
            .unwrap_or_else(|_| self.cursor.to_string())
    }

    /// Column headers, Saturday first
    pub const fn weekday_names() -> &'static [&'static str; DAYS_IN_WEEK] {
        &WEEKDAY_NAMES
    }

    /// Iterates over the day cells, skipping padding
    pub fn days(&self) -> impl Iterator<Item = &GridCell> {
        self.cells.iter().flatten().flatten()
    }
}

pub struct DateField {
    state: FieldState,
    /// Value the host currently holds, as far as this field knows
    value: Option<IsoDate>,
    error: Option<ErrorKind>,
    cursor: ViewCursor,
    picker_open: bool,
    bounds: DateBounds,
    clear_on_invalid: bool,
    clock: Box<dyn Clock>,
    observer: Box<dyn FocusObserver>,
}

impl fmt::Debug for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateField")
            .field("state", &self.state)
            .field("value", &self.value)
            .field("error", &self.error)
            .field("cursor", &self.cursor)
            .field("picker_open", &self.picker_open)
            .field("bounds", &self.bounds)
            .field("clear_on_invalid", &self.clear_on_invalid)
            .finish_non_exhaustive()
    }
}

impl DateField {
    /// Creates an empty field using the system clock
    pub fn new(bounds: DateBounds) -> Self {
        let mut field = Self {
            state: FieldState::Empty,
            value: None,
            error: None,
            cursor: ViewCursor::default(),
            picker_open: false,
            bounds,
            clear_on_invalid: true,
            clock: Box::new(SystemClock),
            observer: Box::new(NoopFocusObserver),
        };
        field.cursor = field.today_cursor();
        field
    }

    /// Creates an empty field from host configuration
    ///
    /// # Errors
    /// Returns `RangeError::InvalidRange` when the configured bounds are inverted.
    pub fn from_config(config: &DateFieldConfig) -> Result<Self, RangeError> {
        let mut field = Self::new(config.bounds()?);
        field.clear_on_invalid = config.clear_on_invalid;
        Ok(field)
    }

    /// Replaces the clock; an empty field re-centers on the new today
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        if self.state == FieldState::Empty {
            self.cursor = self.today_cursor();
        }
        self
    }

    #[must_use]
    pub fn with_observer(mut self, observer: impl FocusObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    pub const fn state(&self) -> &FieldState {
        &self.state
    }

    /// Text to show in the input
    pub fn text(&self) -> &str {
        match &self.state {
            FieldState::Empty => "",
            FieldState::Typing { text, .. } | FieldState::Committed { text, .. } => text,
        }
    }

    /// Value the host currently holds
    pub const fn value(&self) -> Option<IsoDate> {
        self.value
    }

    /// Why the visible text is invalid, if it is
    pub const fn error(&self) -> Option<ErrorKind> {
        self.error
    }

    pub const fn is_invalid(&self) -> bool {
        matches!(self.state, FieldState::Typing { valid: false, .. })
    }

    pub const fn cursor(&self) -> ViewCursor {
        self.cursor
    }

    pub const fn is_picker_open(&self) -> bool {
        self.picker_open
    }

    pub const fn bounds(&self) -> DateBounds {
        self.bounds
    }

    /// True when `day` of the displayed month cannot be picked
    pub fn is_day_disabled(&self, day: u8) -> bool {
        self.bounds
            .is_date_disabled(self.cursor.year, self.cursor.month, day)
    }

    /// Processes one event and returns the change to report, if any.
    pub fn handle(&mut self, event: FieldEvent) -> Option<FieldChange> {
        match event {
            FieldEvent::ValueChanged(value) => {
                self.set_value(value);
                None
            }
            FieldEvent::Input(raw) => self.input(&raw),
            FieldEvent::Blur => self.blur(),
            FieldEvent::OpenPicker => {
                self.open_picker();
                None
            }
            FieldEvent::TogglePicker => {
                if self.picker_open {
                    self.close_picker();
                } else {
                    self.open_picker();
                }
                None
            }
            FieldEvent::ClosePicker | FieldEvent::OutsideClick => {
                self.close_picker();
                None
            }
            FieldEvent::DayClicked(day) => self.select_day(day),
            FieldEvent::Navigate(navigation) => {
                self.navigate(navigation);
                None
            }
            FieldEvent::Clear => Some(self.clear()),
        }
    }

    /// Builds the picker grid for the displayed month
    pub fn grid(&self) -> MonthGrid {
        let layout: MonthLayout = calendar::month_layout(self.cursor.year, self.cursor.month)
            .unwrap_or([[None; DAYS_IN_WEEK]; GRID_ROWS]);
        let selected = match &self.state {
            FieldState::Committed { iso, .. } => iso.to_jalali().ok(),
            FieldState::Empty | FieldState::Typing { .. } => None,
        };
        let today = IsoDate::from(self.clock.today()).to_jalali().ok();
        let is_on = |date: Option<JalaliDate>, day: u8| {
            date.is_some_and(|d| ViewCursor::of(d) == self.cursor && d.day() == day)
        };

        let cells = layout.map(|row| {
            row.map(|slot| {
                slot.map(|day| GridCell {
                    day,
                    disabled: self.is_day_disabled(day),
                    selected: is_on(selected, day),
                    today: is_on(today, day),
                })
            })
        });

        MonthGrid {
            cursor: self.cursor,
            cells,
        }
    }

    fn today_cursor(&self) -> ViewCursor {
        IsoDate::from(self.clock.today())
            .to_jalali()
            .map(ViewCursor::of)
            .unwrap_or_default()
    }

    fn set_value(&mut self, value: Option<IsoDate>) {
        self.error = None;
        let date = value.and_then(|iso| match iso.to_jalali() {
            Ok(date) => Some((iso, date)),
            Err(err) => {
                warn!(iso = %iso, error = %err, "ignoring value outside the Jalali span");
                None
            }
        });

        match date {
            Some((iso, date)) => {
                debug!(iso = %iso, "value set by host");
                self.state = FieldState::Committed {
                    iso,
                    text: date.to_string(),
                };
                self.value = Some(iso);
                self.cursor = ViewCursor::of(date);
            }
            None => {
                debug!("value cleared by host");
                self.state = FieldState::Empty;
                self.value = None;
                self.cursor = self.today_cursor();
            }
        }
    }

    /// Parses text into an in-bounds date.
    fn resolve(&self, text: &str) -> Result<(IsoDate, JalaliDate), ParseError> {
        let date = parse_jalali_input(text)?;
        let iso = self.bounds.check(date.to_iso()?)?;
        Ok((iso, date))
    }

    fn commit(&mut self, iso: IsoDate, date: JalaliDate) -> FieldChange {
        debug!(iso = %iso, jalali = %date, "date committed");
        self.state = FieldState::Committed {
            iso,
            text: date.to_string(),
        };
        self.value = Some(iso);
        self.error = None;
        self.cursor = ViewCursor::of(date);
        FieldChange::Committed(iso)
    }

    fn mark_invalid(&mut self, text: String, err: &ParseError) {
        debug!(text = %text, error = %err, "invalid date text");
        self.error = Some(err.kind());
        self.state = FieldState::Typing { text, valid: false };
    }

    /// Clears the host value if it holds one
    fn release_value(&mut self) -> Option<FieldChange> {
        self.value.take().map(|_| FieldChange::Cleared)
    }

    fn input(&mut self, raw: &str) -> Option<FieldChange> {
        let text = sanitize_input(raw);
        trace!(raw = %raw, text = %text, "input");

        if text.is_empty() {
            self.state = FieldState::Empty;
            self.error = None;
            return self.release_value();
        }

        if digit_count(&text) < FULL_INPUT_DIGITS {
            self.error = None;
            self.state = FieldState::Typing { text, valid: true };
            return None;
        }

        match self.resolve(&text) {
            Ok((iso, date)) => Some(self.commit(iso, date)),
            Err(err) => {
                self.mark_invalid(text, &err);
                if self.clear_on_invalid {
                    self.release_value()
                } else {
                    None
                }
            }
        }
    }

    fn blur(&mut self) -> Option<FieldChange> {
        let FieldState::Typing { text, .. } = &self.state else {
            return None;
        };
        let text = text.clone();
        match self.resolve(&text) {
            Ok((iso, date)) => {
                let unchanged = self.value == Some(iso);
                let change = self.commit(iso, date);
                (!unchanged).then_some(change)
            }
            Err(err) => {
                self.mark_invalid(text, &err);
                None
            }
        }
    }

    fn select_day(&mut self, day: u8) -> Option<FieldChange> {
        let ViewCursor { year, month } = self.cursor;
        if self.bounds.is_date_disabled(year, month, day) {
            debug!(year, month, day, "ignoring click on disabled day");
            return None;
        }
        let date = JalaliDate::from_parts(year, month, day).ok()?;
        let iso = date.to_iso().ok()?;
        let change = self.commit(iso, date);
        self.close_picker();
        Some(change)
    }

    fn navigate(&mut self, navigation: Navigation) {
        let target = match navigation {
            Navigation::PrevMonth => self.cursor.shifted(-1),
            Navigation::NextMonth => self.cursor.shifted(1),
            Navigation::PrevYear => self.cursor.shifted(-i32::from(MAX_MONTH)),
            Navigation::NextYear => self.cursor.shifted(i32::from(MAX_MONTH)),
            Navigation::Today => Some(self.today_cursor()),
        };
        match target {
            Some(cursor) => {
                debug!(from = %self.cursor, to = %cursor, ?navigation, "picker navigated");
                self.cursor = cursor;
            }
            None => debug!(cursor = %self.cursor, ?navigation, "navigation stopped at span edge"),
        }
    }

    fn clear(&mut self) -> FieldChange {
        debug!("field cleared");
        self.state = FieldState::Empty;
        self.error = None;
        self.value = None;
        FieldChange::Cleared
    }

    fn open_picker(&mut self) {
        if !self.picker_open {
            debug!(cursor = %self.cursor, "picker opened");
            self.picker_open = true;
            self.observer.watch();
        }
    }

    fn close_picker(&mut self) {
        if self.picker_open {
            debug!("picker closed");
            self.picker_open = false;
            self.observer.unwatch();
        }
    }
}

impl Drop for DateField {
    fn drop(&mut self) {
        self.close_picker();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::test_utils::{iso, jalali};

    struct FixedClock(NaiveDate);

    impl Clock for FixedClock {
        fn today(&self) -> NaiveDate {
            self.0
        }
    }

    /// Counts active watches so tests can check release.
    #[derive(Clone, Default)]
    struct RecordingObserver {
        active: Rc<Cell<i32>>,
        total: Rc<Cell<u32>>,
    }

    impl FocusObserver for RecordingObserver {
        fn watch(&mut self) {
            self.active.set(self.active.get() + 1);
            self.total.set(self.total.get() + 1);
        }

        fn unwatch(&mut self) {
            self.active.set(self.active.get() - 1);
        }
    }

    fn field() -> DateField {
        DateField::new(DateBounds::UNBOUNDED).with_clock(FixedClock(iso("2024-12-10").naive()))
    }

    fn bounded_field() -> DateField {
        let config =
            DateFieldConfig::from_json(r#"{"minDate": "2024-01-01", "maxDate": "2024-12-31"}"#)
                .unwrap();
        DateField::from_config(&config)
            .unwrap()
            .with_clock(FixedClock(iso("2024-12-10").naive()))
    }

    fn type_chars(field: &mut DateField, typed: &str) -> Vec<FieldChange> {
        let mut changes = Vec::new();
        for c in typed.chars() {
            let mut text = field.text().to_owned();
            text.push(c);
            changes.extend(field.handle(FieldEvent::Input(text)));
        }
        changes
    }

    #[test]
    fn test_starts_empty_on_today() {
        let field = field();
        assert_eq!(field.state(), &FieldState::Empty);
        assert_eq!(field.text(), "");
        assert_eq!(field.value(), None);
        assert_eq!(field.cursor(), ViewCursor { year: 1403, month: 9 });
        assert!(!field.is_picker_open());
    }

    #[test]
    fn test_typing_commits_on_full_length() {
        let mut field = field();
        let changes = type_chars(&mut field, "14030920");
        assert_eq!(changes, vec![FieldChange::Committed(iso("2024-12-10"))]);
        assert_eq!(field.text(), "1403/09/20");
        assert_eq!(field.value(), Some(iso("2024-12-10")));
        assert!(matches!(field.state(), FieldState::Committed { .. }));
        assert_eq!(changes[0].to_string(), "2024-12-10");
    }

    #[test]
    fn test_partial_typing_is_valid_and_silent() {
        let mut field = field();
        let changes = type_chars(&mut field, "140309");
        assert!(changes.is_empty());
        assert_eq!(
            field.state(),
            &FieldState::Typing {
                text: "1403/09".into(),
                valid: true
            }
        );
        assert_eq!(field.error(), None);
    }

    #[test]
    fn test_persian_digits_are_accepted() {
        let mut field = field();
        let change = field.handle(FieldEvent::Input("۱۴۰۳۰۹۲۰".into()));
        assert_eq!(change, Some(FieldChange::Committed(iso("2024-12-10"))));
        assert_eq!(field.text(), "1403/09/20");
    }

    #[test]
    fn test_full_length_invalid_without_value() {
        let mut field = field();
        let changes = type_chars(&mut field, "14030931");
        assert!(changes.is_empty());
        assert!(field.is_invalid());
        assert_eq!(field.text(), "1403/09/31");
        assert_eq!(field.error(), Some(ErrorKind::InvalidCalendarDate));
    }

    #[test]
    fn test_full_length_invalid_clears_host_value() {
        let mut field = field();
        field.handle(FieldEvent::ValueChanged(Some(iso("2024-12-10"))));
        let change = field.handle(FieldEvent::Input("14030931".into()));
        assert_eq!(change, Some(FieldChange::Cleared));
        assert_eq!(change.map(|c| c.to_string()).as_deref(), Some(""));
        assert_eq!(field.value(), None);
        // visible text is preserved
        assert_eq!(field.text(), "1403/09/31");
        assert!(field.is_invalid());

        // already cleared, nothing more to report
        assert_eq!(field.handle(FieldEvent::Input("14030932".into())), None);
    }

    #[test]
    fn test_full_length_invalid_kept_when_configured() {
        let config = DateFieldConfig {
            clear_on_invalid: false,
            ..DateFieldConfig::default()
        };
        let mut field = DateField::from_config(&config).unwrap();
        field.handle(FieldEvent::ValueChanged(Some(iso("2024-12-10"))));
        assert_eq!(field.handle(FieldEvent::Input("14030931".into())), None);
        assert_eq!(field.value(), Some(iso("2024-12-10")));
        assert!(field.is_invalid());
    }

    #[test]
    fn test_typed_date_outside_bounds_is_not_committed() {
        let mut field = bounded_field();
        // 1404/01/01 == 2025-03-21
        assert_eq!(field.handle(FieldEvent::Input("14040101".into())), None);
        assert!(field.is_invalid());
        assert_eq!(field.error(), Some(ErrorKind::OutOfRange));
        assert_eq!(field.value(), None);
    }

    #[test]
    fn test_blur_normalizes_text() {
        let mut field = field();
        assert_eq!(field.handle(FieldEvent::Input("1403/9/1".into())), None);
        assert_eq!(field.text(), "1403/9/1");
        let change = field.handle(FieldEvent::Blur);
        assert_eq!(change, Some(FieldChange::Committed(iso("2024-11-21"))));
        assert_eq!(field.text(), "1403/09/01");
    }

    #[test]
    fn test_blur_invalid_marks_without_clearing() {
        let mut field = field();
        field.handle(FieldEvent::ValueChanged(Some(iso("2024-12-10"))));
        field.handle(FieldEvent::Input("1403/9".into()));
        assert_eq!(field.handle(FieldEvent::Blur), None);
        assert!(field.is_invalid());
        assert_eq!(field.error(), Some(ErrorKind::MalformedInput));
        assert_eq!(field.text(), "1403/9");
        assert_eq!(field.value(), Some(iso("2024-12-10")));
    }

    #[test]
    fn test_blur_same_value_canonicalizes_silently() {
        let mut field = field();
        field.handle(FieldEvent::ValueChanged(Some(iso("2024-12-10"))));
        assert_eq!(field.handle(FieldEvent::Input("1403/9/20".into())), None);
        assert!(matches!(field.state(), FieldState::Typing { .. }));

        assert_eq!(field.handle(FieldEvent::Blur), None);
        assert_eq!(field.text(), "1403/09/20");
        assert_eq!(field.value(), Some(iso("2024-12-10")));
        assert!(matches!(field.state(), FieldState::Committed { .. }));
    }

    #[test]
    fn test_blur_when_committed_is_silent() {
        let mut field = field();
        field.handle(FieldEvent::ValueChanged(Some(iso("2024-12-10"))));
        assert_eq!(field.handle(FieldEvent::Blur), None);
        assert_eq!(field.handle(FieldEvent::Blur), None);
    }

    #[test]
    fn test_deleting_all_text_clears() {
        let mut field = field();
        field.handle(FieldEvent::ValueChanged(Some(iso("2024-12-10"))));
        assert_eq!(field.handle(FieldEvent::Input(String::new())), Some(FieldChange::Cleared));
        assert_eq!(field.state(), &FieldState::Empty);
        assert_eq!(field.handle(FieldEvent::Input("x".into())), None);
    }

    #[test]
    fn test_external_value_change() {
        let mut field = field();
        assert_eq!(field.handle(FieldEvent::ValueChanged(Some(iso("2024-01-01")))), None);
        assert_eq!(field.text(), "1402/10/11");
        assert_eq!(field.cursor(), ViewCursor { year: 1402, month: 10 });

        assert_eq!(field.handle(FieldEvent::ValueChanged(None)), None);
        assert_eq!(field.state(), &FieldState::Empty);
        assert_eq!(field.text(), "");
        assert_eq!(field.value(), None);
    }

    #[test]
    fn test_external_value_outside_span_is_empty() {
        let mut field = field();
        assert_eq!(field.handle(FieldEvent::ValueChanged(Some(iso("0500-01-01")))), None);
        assert_eq!(field.state(), &FieldState::Empty);
    }

    #[test]
    fn test_external_value_resets_typing() {
        let mut field = field();
        field.handle(FieldEvent::Input("1403/0".into()));
        field.handle(FieldEvent::ValueChanged(Some(iso("2024-12-10"))));
        assert_eq!(field.text(), "1403/09/20");
        assert_eq!(field.error(), None);
    }

    #[test]
    fn test_day_click_commits_and_closes() {
        let observer = RecordingObserver::default();
        let mut field = field().with_observer(observer.clone());
        field.handle(FieldEvent::OpenPicker);
        assert!(field.is_picker_open());
        assert_eq!(observer.active.get(), 1);

        let change = field.handle(FieldEvent::DayClicked(20));
        assert_eq!(change, Some(FieldChange::Committed(iso("2024-12-10"))));
        assert!(!field.is_picker_open());
        assert_eq!(observer.active.get(), 0);
        assert_eq!(field.text(), "1403/09/20");
    }

    #[test]
    fn test_day_click_outside_bounds_is_noop() {
        let mut field = bounded_field();
        field.handle(FieldEvent::OpenPicker);
        field.handle(FieldEvent::Navigate(Navigation::NextMonth));
        let before_state = field.state().clone();
        // 1403/10/12 == 2025-01-01
        assert!(field.is_day_disabled(12));
        assert_eq!(field.handle(FieldEvent::DayClicked(12)), None);
        assert_eq!(field.state(), &before_state);
        assert!(field.is_picker_open());

        // the bound itself is selectable
        assert_eq!(
            field.handle(FieldEvent::DayClicked(11)),
            Some(FieldChange::Committed(iso("2024-12-31")))
        );
    }

    #[test]
    fn test_day_click_on_missing_day_is_noop() {
        let mut field = field();
        assert_eq!(field.handle(FieldEvent::DayClicked(31)), None);
        assert_eq!(field.handle(FieldEvent::DayClicked(0)), None);
        assert_eq!(field.state(), &FieldState::Empty);
    }

    #[test]
    fn test_month_navigation_wraps() {
        let mut field = field();
        field.handle(FieldEvent::ValueChanged(Some(jalali(1403, 12, 1).to_iso().unwrap())));
        field.handle(FieldEvent::Navigate(Navigation::NextMonth));
        assert_eq!(field.cursor(), ViewCursor { year: 1404, month: 1 });

        field.handle(FieldEvent::ValueChanged(Some(jalali(1403, 1, 1).to_iso().unwrap())));
        field.handle(FieldEvent::Navigate(Navigation::PrevMonth));
        assert_eq!(field.cursor(), ViewCursor { year: 1402, month: 12 });
    }

    #[test]
    fn test_navigation_leaves_selection_alone() {
        let mut field = field();
        field.handle(FieldEvent::ValueChanged(Some(iso("2024-12-10"))));
        field.handle(FieldEvent::Navigate(Navigation::NextYear));
        assert_eq!(field.cursor(), ViewCursor { year: 1404, month: 9 });
        field.handle(FieldEvent::Navigate(Navigation::PrevYear));
        field.handle(FieldEvent::Navigate(Navigation::PrevYear));
        assert_eq!(field.cursor(), ViewCursor { year: 1402, month: 9 });
        assert_eq!(field.value(), Some(iso("2024-12-10")));
        assert_eq!(field.text(), "1403/09/20");
    }

    #[test]
    fn test_navigation_stops_at_span_edges() {
        let mut field = field();
        field.handle(FieldEvent::ValueChanged(Some(jalali(1, 1, 1).to_iso().unwrap())));
        field.handle(FieldEvent::Navigate(Navigation::PrevMonth));
        assert_eq!(field.cursor(), ViewCursor { year: 1, month: 1 });

        field.handle(FieldEvent::ValueChanged(Some(jalali(3177, 12, 1).to_iso().unwrap())));
        field.handle(FieldEvent::Navigate(Navigation::NextMonth));
        assert_eq!(field.cursor(), ViewCursor { year: 3177, month: 12 });
    }

    #[test]
    fn test_today_moves_cursor_only() {
        let mut field = field();
        field.handle(FieldEvent::ValueChanged(Some(iso("2020-03-20"))));
        assert_eq!(field.cursor(), ViewCursor { year: 1399, month: 1 });
        field.handle(FieldEvent::Navigate(Navigation::Today));
        assert_eq!(field.cursor(), ViewCursor { year: 1403, month: 9 });
        assert_eq!(field.value(), Some(iso("2020-03-20")));
    }

    #[test]
    fn test_clear_button() {
        let mut field = field();
        field.handle(FieldEvent::ValueChanged(Some(iso("2024-12-10"))));
        assert_eq!(field.handle(FieldEvent::Clear), Some(FieldChange::Cleared));
        assert_eq!(field.state(), &FieldState::Empty);
        assert_eq!(field.value(), None);
        assert_eq!(field.text(), "");
    }

    #[test]
    fn test_outside_click_closes_picker_only() {
        let observer = RecordingObserver::default();
        let mut field = field().with_observer(observer.clone());
        field.handle(FieldEvent::Input("1403/0".into()));
        field.handle(FieldEvent::TogglePicker);
        assert!(field.is_picker_open());

        assert_eq!(field.handle(FieldEvent::OutsideClick), None);
        assert!(!field.is_picker_open());
        assert_eq!(field.text(), "1403/0");
        assert_eq!(observer.active.get(), 0);

        // closing twice releases once
        field.handle(FieldEvent::ClosePicker);
        assert_eq!(observer.active.get(), 0);
        assert_eq!(observer.total.get(), 1);
    }

    #[test]
    fn test_toggle_and_reopen() {
        let observer = RecordingObserver::default();
        let mut field = field().with_observer(observer.clone());
        field.handle(FieldEvent::TogglePicker);
        field.handle(FieldEvent::OpenPicker);
        assert_eq!(observer.active.get(), 1);
        field.handle(FieldEvent::TogglePicker);
        assert!(!field.is_picker_open());
        field.handle(FieldEvent::TogglePicker);
        assert_eq!(observer.total.get(), 2);
        assert_eq!(observer.active.get(), 1);
    }

    #[test]
    fn test_drop_releases_observer() {
        let observer = RecordingObserver::default();
        {
            let mut field = field().with_observer(observer.clone());
            field.handle(FieldEvent::OpenPicker);
            assert_eq!(observer.active.get(), 1);
        }
        assert_eq!(observer.active.get(), 0);
    }

    #[test]
    fn test_grid_flags() {
        let mut field = bounded_field();
        field.handle(FieldEvent::ValueChanged(Some(iso("2024-12-01"))));
        let grid = field.grid();
        assert_eq!(grid.title(), "Azar 1403");
        assert_eq!(MonthGrid::weekday_names()[0], "Shanbe");
        assert_eq!(grid.days().count(), 30);
        // 1403/09/01 is a Thursday
        assert_eq!(grid.cells[0][5].map(|c| c.day), Some(1));

        let selected: Vec<u8> = grid.days().filter(|c| c.selected).map(|c| c.day).collect();
        assert_eq!(selected, vec![11]);
        let today: Vec<u8> = grid.days().filter(|c| c.today).map(|c| c.day).collect();
        assert_eq!(today, vec![20]);
        assert!(grid.days().all(|c| !c.disabled));

        field.handle(FieldEvent::Navigate(Navigation::NextMonth));
        let next = field.grid();
        let disabled: Vec<u8> = next.days().filter(|c| c.disabled).map(|c| c.day).collect();
        assert_eq!(disabled, (12..=30).collect::<Vec<u8>>());
        assert!(next.days().all(|c| !c.selected && !c.today));
    }

    #[test]
    fn test_view_cursor_shifted() {
        let cursor = ViewCursor { year: 1403, month: 12 };
        assert_eq!(cursor.shifted(1), Some(ViewCursor { year: 1404, month: 1 }));
        assert_eq!(cursor.shifted(-12), Some(ViewCursor { year: 1402, month: 12 }));
        assert_eq!(cursor.shifted(-23), Some(ViewCursor { year: 1402, month: 1 }));
        assert_eq!(ViewCursor { year: 1, month: 1 }.shifted(-1), None);
        assert_eq!(cursor.days(), 30);
        assert_eq!(cursor.to_string(), "1403/12");
    }

    #[test]
    fn test_view_cursor_serde() {
        let cursor = ViewCursor { year: 1403, month: 9 };
        let json = serde_json::to_string(&cursor).unwrap();
        assert_eq!(json, r#"{"year":1403,"month":9}"#);
        assert_eq!(serde_json::from_str::<ViewCursor>(&json).unwrap(), cursor);
    }
}
