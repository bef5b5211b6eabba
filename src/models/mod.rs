//! Timetabling domain models.
//!
//! Entity records supplied by the external repository (divisions, subjects,
//! faculty, rooms, time slots) and the solution types returned to it.
//!
//! # Domain Mappings
//!
//! | u-timetable | Generic scheduling |
//! |-------------|--------------------|
//! | Division | Task (demand owner) |
//! | Subject | Activity template |
//! | Faculty | Human resource |
//! | Room | Primary resource |
//! | TimeSlot | Calendar window |

mod division;
mod faculty;
mod room;
mod schedule;
mod snapshot;
mod subject;
mod time_slot;

pub use division::Division;
pub use faculty::Faculty;
pub use room::{Room, RoomType};
pub use schedule::{count_kind, ConflictKind, ConflictRecord, ScheduleEntry};
pub use snapshot::EntitySnapshot;
pub use subject::{SessionType, Subject};
pub use time_slot::{weekday_hourly_grid, Day, TimeSlot};
