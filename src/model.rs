use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::time::{self, hhmm, hhmm_opt};

/// Minutes since local midnight.
pub type Minutes = i32;

/// Half-open interval `[start, end)` in minutes of day.
/// A zero-length span stands for a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub start: Minutes,
    pub end: Minutes,
}

impl Span {
    pub fn new(start: Minutes, end: Minutes) -> Self {
        Self { start, end }
    }

    /// Zero-length span at `t`.
    pub fn at(t: Minutes) -> Self {
        Self { start: t, end: t }
    }

    /// Parse a pair of `"HH:MM"` strings.
    pub fn parse(start: &str, end: &str) -> Option<Self> {
        Some(Self::new(time::parse_time_24h(start)?, time::parse_time_24h(end)?))
    }

    pub fn duration(&self) -> Minutes {
        self.end - self.start
    }

    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains_instant(&self, t: Minutes) -> bool {
        self.start <= t && t < self.end
    }

    /// Returns true if `self` fully contains `other`.
    pub fn contains_span(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Booking collision test: `self` (the request) starts inside `existing`,
    /// ends inside it, or swallows it whole.
    ///
    /// Unlike [`Span::overlaps`] this treats a zero-length request at
    /// either edge of `existing` as colliding.
    pub fn collides_with(&self, existing: &Span) -> bool {
        (self.start >= existing.start && self.start < existing.end)
            || (self.end > existing.start && self.end <= existing.end)
            || (self.start <= existing.start && self.end >= existing.end)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", time::format_hhmm(self.start), time::format_hhmm(self.end))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayOfWeek {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Sun,
        DayOfWeek::Mon,
        DayOfWeek::Tue,
        DayOfWeek::Wed,
        DayOfWeek::Thu,
        DayOfWeek::Fri,
        DayOfWeek::Sat,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DayOfWeek::Sun => "Sun",
            DayOfWeek::Mon => "Mon",
            DayOfWeek::Tue => "Tue",
            DayOfWeek::Wed => "Wed",
            DayOfWeek::Thu => "Thu",
            DayOfWeek::Fri => "Fri",
            DayOfWeek::Sat => "Sat",
        }
    }
}

impl From<Weekday> for DayOfWeek {
    fn from(day: Weekday) -> Self {
        Self::ALL[day.num_days_from_sunday() as usize]
    }
}

impl fmt::Display for DayOfWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffType {
    /// Appointment-based, capacity measured by concurrent bookings.
    Dynamic,
    /// Fixed recurring slots, capacity measured per slot.
    Static,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomType {
    #[serde(alias = "fixed")]
    Static,
    #[serde(alias = "flexible")]
    Dynamic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Confirmed,
    Pending,
    #[serde(alias = "attended")]
    Completed,
    Cancelled,
    NeedConfirm,
    NoShow,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Pending => "pending",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::NeedConfirm => "need_confirm",
            BookingStatus::NoShow => "no_show",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    #[default]
    Unpaid,
}

/// One weekday entry of a staff member's recurring week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySchedule {
    pub day: DayOfWeek,
    pub is_available: bool,
    #[serde(with = "hhmm")]
    pub start_time: Minutes,
    #[serde(with = "hhmm")]
    pub end_time: Minutes,
}

impl DaySchedule {
    pub fn window(&self) -> Span {
        Span::new(self.start_time, self.end_time)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomAssignment {
    pub day: DayOfWeek,
    pub room_id: String,
    #[serde(with = "hhmm")]
    pub start_time: Minutes,
    #[serde(with = "hhmm")]
    pub end_time: Minutes,
}

impl RoomAssignment {
    pub fn window(&self) -> Span {
        Span::new(self.start_time, self.end_time)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    pub id: String,
    pub name: String,
    pub branch_id: String,
    pub staff_type: StaffType,
    #[serde(default)]
    pub schedule: Vec<DaySchedule>,
    #[serde(default)]
    pub max_concurrent_bookings: Option<u32>,
    #[serde(default)]
    pub room_assignments: Vec<RoomAssignment>,
}

impl Staff {
    pub fn schedule_for(&self, day: DayOfWeek) -> Option<&DaySchedule> {
        self.schedule.iter().find(|s| s.day == day)
    }

    pub fn room_assignment_for(&self, day: DayOfWeek) -> Option<&RoomAssignment> {
        self.room_assignments.iter().find(|a| a.day == day)
    }

    /// Max concurrent bookings (default 1).
    pub fn max_concurrent(&self) -> u32 {
        self.max_concurrent_bookings.unwrap_or(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub name: String,
    pub branch_id: String,
    pub room_type: RoomType,
    pub capacity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

fn default_party_size() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub staff_id: String,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub slot_id: Option<String>,
    #[serde(default)]
    pub service_name: Option<String>,
    pub status: BookingStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default = "default_party_size")]
    pub party_size: u32,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub customer: Customer,
}

impl Booking {
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Start/end as minutes of the start day.
    pub fn span(&self) -> Span {
        Span::new(time::minutes_of_day(&self.start), time::minutes_of_day(&self.end))
    }

    pub fn is_active(&self) -> bool {
        self.status != BookingStatus::Cancelled
    }

    /// Seats this booking takes in a slot; never below 1.
    pub fn occupancy(&self) -> u32 {
        self.party_size.max(1)
    }

    pub fn covers(&self, t: &NaiveDateTime) -> bool {
        self.start <= *t && *t < self.end
    }
}

/// Booking as submitted by a caller; the id is assigned on create when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingDraft {
    #[serde(default)]
    pub id: Option<String>,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub staff_id: String,
    #[serde(default)]
    pub room_id: Option<String>,
    #[serde(default)]
    pub slot_id: Option<String>,
    #[serde(default)]
    pub service_name: Option<String>,
    #[serde(default = "default_draft_status")]
    pub status: BookingStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default = "default_party_size")]
    pub party_size: u32,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub customer: Customer,
}

fn default_draft_status() -> BookingStatus {
    BookingStatus::Confirmed
}

impl BookingDraft {
    pub fn new(staff_id: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            id: None,
            start,
            end,
            staff_id: staff_id.into(),
            room_id: None,
            slot_id: None,
            service_name: None,
            status: BookingStatus::Confirmed,
            payment_status: PaymentStatus::Unpaid,
            party_size: 1,
            notes: None,
            customer: Customer::default(),
        }
    }

    pub fn into_booking(self, id: String) -> Booking {
        Booking {
            id,
            start: self.start,
            end: self.end,
            staff_id: self.staff_id,
            room_id: self.room_id,
            slot_id: self.slot_id,
            service_name: self.service_name,
            status: self.status,
            payment_status: self.payment_status,
            party_size: self.party_size,
            notes: self.notes,
            customer: self.customer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaticServiceSlot {
    pub id: String,
    pub branch_id: String,
    pub room_id: String,
    /// Weekly recurrence.
    #[serde(default)]
    pub day_of_week: Option<DayOfWeek>,
    /// One-off date.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(with = "hhmm")]
    pub start_time: Minutes,
    #[serde(with = "hhmm")]
    pub end_time: Minutes,
    pub capacity: u32,
    #[serde(default)]
    pub instructor_staff_id: Option<String>,
    pub service_id: String,
    pub service_name: String,
    /// Minor currency units.
    #[serde(default)]
    pub price: u32,
}

impl StaticServiceSlot {
    pub fn window(&self) -> Span {
        Span::new(self.start_time, self.end_time)
    }

    /// Recurs on the weekday of `date`, or is scheduled on exactly `date`.
    pub fn offered_on(&self, date: NaiveDate) -> bool {
        self.day_of_week == Some(time::day_of_week(date)) || self.date == Some(date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOffRequest {
    pub id: String,
    pub staff_id: String,
    pub start_date: NaiveDate,
    /// Inclusive.
    pub end_date: NaiveDate,
    pub approved: bool,
    pub all_day: bool,
    #[serde(default, with = "hhmm_opt")]
    pub start_time: Option<Minutes>,
    #[serde(default, with = "hhmm_opt")]
    pub end_time: Option<Minutes>,
    #[serde(default)]
    pub reason: Option<String>,
}

impl TimeOffRequest {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn is_single_day(&self) -> bool {
        self.start_date == self.end_date
    }

    /// Blocked window on a covered date, `None` meaning the whole day.
    ///
    /// Only a single-day partial request narrows to its times; a partial
    /// request spanning several days blocks each of them entirely.
    pub fn blocked_window(&self) -> Option<Span> {
        if self.all_day || !self.is_single_day() {
            return None;
        }
        match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => Some(Span::new(start, end)),
            _ => None,
        }
    }
}

/// Everything the calendar reads: staff, rooms, slots, time-off, and the
/// bookings present at load time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Directory {
    #[serde(default)]
    pub staff: Vec<Staff>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub slots: Vec<StaticServiceSlot>,
    #[serde(default)]
    pub time_off: Vec<TimeOffRequest>,
    #[serde(default)]
    pub bookings: Vec<Booking>,
}

impl Directory {
    pub fn staff_member(&self, id: &str) -> Option<&Staff> {
        self.staff.iter().find(|s| s.id == id)
    }

    pub fn room(&self, id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn slot(&self, id: &str) -> Option<&StaticServiceSlot> {
        self.slots.iter().find(|s| s.id == id)
    }
}

/// Booking change broadcast to subscribers of a staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingEvent {
    Created(Booking),
    Updated { before: Booking, after: Booking },
    Cancelled(Booking),
    StatusChanged {
        id: String,
        staff_id: String,
        status: BookingStatus,
    },
    PaymentChanged {
        id: String,
        staff_id: String,
        payment_status: PaymentStatus,
    },
}

// ── Query result types ───────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableReason {
    StaffNotFound,
    NoSchedule,
    NotWorking,
    OutsideWorkingHours(Span),
    RoomNotFound,
    RoomNoCapacity,
    RoomFull,
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnavailableReason::StaffNotFound => f.write_str("Staff member not found"),
            UnavailableReason::NoSchedule => f.write_str("No schedule found for this day"),
            UnavailableReason::NotWorking => f.write_str("Staff member is not working on this day"),
            UnavailableReason::OutsideWorkingHours(hours) => {
                write!(f, "Staff working hours are {hours}")
            }
            UnavailableReason::RoomNotFound => f.write_str("Room not found"),
            UnavailableReason::RoomNoCapacity => f.write_str("Room has no capacity"),
            UnavailableReason::RoomFull => f.write_str("Room is fully booked for this time"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    Available,
    Unavailable(UnavailableReason),
}

impl Availability {
    pub fn is_available(&self) -> bool {
        matches!(self, Availability::Available)
    }

    pub fn reason(&self) -> Option<UnavailableReason> {
        match self {
            Availability::Available => None,
            Availability::Unavailable(reason) => Some(*reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotOccupancy {
    pub remaining: u32,
    pub total: u32,
    pub occupied: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityColor {
    Error,
    Warning,
    Success,
}

impl CapacityColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            CapacityColor::Error => "error",
            CapacityColor::Warning => "warning",
            CapacityColor::Success => "success",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_basics() {
        let s = Span::new(600, 660);
        assert_eq!(s.duration(), 60);
        assert!(s.contains_instant(600));
        assert!(s.contains_instant(659));
        assert!(!s.contains_instant(660)); // half-open
    }

    #[test]
    fn span_overlap() {
        let a = Span::new(100, 200);
        let b = Span::new(150, 250);
        let c = Span::new(200, 300);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c)); // adjacent, not overlapping
    }

    #[test]
    fn span_contains_span() {
        let outer = Span::new(100, 400);
        assert!(outer.contains_span(&Span::new(150, 300)));
        assert!(outer.contains_span(&outer));
        assert!(!outer.contains_span(&Span::new(50, 200)));
    }

    #[test]
    fn collides_with_covers_all_three_cases() {
        let existing = Span::new(600, 660);
        assert!(Span::new(630, 700).collides_with(&existing)); // starts inside
        assert!(Span::new(570, 630).collides_with(&existing)); // ends inside
        assert!(Span::new(570, 700).collides_with(&existing)); // swallows
        assert!(Span::new(630, 645).collides_with(&existing)); // nested
    }

    #[test]
    fn collides_with_is_half_open() {
        let existing = Span::new(600, 660);
        assert!(!Span::new(540, 600).collides_with(&existing));
        assert!(!Span::new(660, 720).collides_with(&existing));
    }

    #[test]
    fn zero_length_request_collides_at_either_edge() {
        let existing = Span::new(600, 660);
        assert!(Span::at(600).collides_with(&existing));
        assert!(Span::at(659).collides_with(&existing));
        // An instant at the booking's end still ends inside it.
        assert!(Span::at(660).collides_with(&existing));
        assert!(!Span::at(599).collides_with(&existing));
        assert!(!Span::at(661).collides_with(&existing));
    }

    #[test]
    fn span_display_uses_hhmm() {
        assert_eq!(Span::new(9 * 60, 17 * 60).to_string(), "09:00 - 17:00");
    }

    #[test]
    fn weekday_maps_to_day_of_week() {
        assert_eq!(DayOfWeek::from(Weekday::Sun), DayOfWeek::Sun);
        assert_eq!(DayOfWeek::from(Weekday::Mon), DayOfWeek::Mon);
        assert_eq!(DayOfWeek::from(Weekday::Sat), DayOfWeek::Sat);
    }

    #[test]
    fn booking_status_accepts_attended_alias() {
        let s: BookingStatus = serde_json::from_str("\"attended\"").unwrap();
        assert_eq!(s, BookingStatus::Completed);
        let s: BookingStatus = serde_json::from_str("\"need_confirm\"").unwrap();
        assert_eq!(s, BookingStatus::NeedConfirm);
    }

    #[test]
    fn room_type_accepts_aliases() {
        let r: RoomType = serde_json::from_str("\"fixed\"").unwrap();
        assert_eq!(r, RoomType::Static);
        let r: RoomType = serde_json::from_str("\"flexible\"").unwrap();
        assert_eq!(r, RoomType::Dynamic);
    }

    #[test]
    fn booking_defaults_party_size_and_payment() {
        let json = r#"{
            "id": "b1",
            "start": "2026-10-12T10:00:00",
            "end": "2026-10-12T11:00:00",
            "staffId": "Staff-1",
            "status": "confirmed"
        }"#;
        let b: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(b.party_size, 1);
        assert_eq!(b.payment_status, PaymentStatus::Unpaid);
        assert_eq!(b.span(), Span::new(600, 660));
        assert!(b.is_active());
    }

    #[test]
    fn occupancy_never_below_one() {
        let json = r#"{
            "id": "b1",
            "start": "2026-10-12T10:00:00",
            "end": "2026-10-12T11:00:00",
            "staffId": "Staff-1",
            "status": "confirmed",
            "partySize": 0
        }"#;
        let b: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(b.occupancy(), 1);
    }

    #[test]
    fn staff_schedule_parses_hhmm() {
        let json = r#"{
            "id": "Staff-1",
            "name": "Aino",
            "branchId": "branch-1",
            "staffType": "dynamic",
            "schedule": [
                { "day": "Mon", "isAvailable": true, "startTime": "09:00", "endTime": "17:00" }
            ]
        }"#;
        let s: Staff = serde_json::from_str(json).unwrap();
        let mon = s.schedule_for(DayOfWeek::Mon).unwrap();
        assert_eq!(mon.window(), Span::new(540, 1020));
        assert!(s.schedule_for(DayOfWeek::Tue).is_none());
        assert_eq!(s.max_concurrent(), 1);
    }

    #[test]
    fn time_off_blocked_window() {
        let d = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
        let mut req = TimeOffRequest {
            id: "t1".into(),
            staff_id: "Staff-1".into(),
            start_date: d,
            end_date: d,
            approved: true,
            all_day: false,
            start_time: Some(600),
            end_time: Some(720),
            reason: None,
        };
        assert_eq!(req.blocked_window(), Some(Span::new(600, 720)));

        req.end_date = d.succ_opt().unwrap();
        assert_eq!(req.blocked_window(), None); // multi-day blocks whole days

        req.end_date = d;
        req.all_day = true;
        assert_eq!(req.blocked_window(), None);
    }

    #[test]
    fn slot_offered_on_weekday_or_date() {
        let monday = NaiveDate::from_ymd_opt(2026, 10, 12).unwrap();
        let tuesday = monday.succ_opt().unwrap();
        let mut slot = StaticServiceSlot {
            id: "s1".into(),
            branch_id: "branch-1".into(),
            room_id: "room-1".into(),
            day_of_week: Some(DayOfWeek::Mon),
            date: None,
            start_time: 600,
            end_time: 660,
            capacity: 5,
            instructor_staff_id: None,
            service_id: "yoga".into(),
            service_name: "Yoga".into(),
            price: 2500,
        };
        assert!(slot.offered_on(monday));
        assert!(!slot.offered_on(tuesday));

        slot.day_of_week = None;
        slot.date = Some(tuesday);
        assert!(slot.offered_on(tuesday));
        assert!(!slot.offered_on(monday));
    }
}
