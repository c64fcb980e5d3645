pub mod day;
pub mod event;
pub mod material;
pub mod school;

pub use day::{DaySchedule, DayType, SetDayRequest};
pub use event::{Event, NewEventRequest, UpdateEventRequest};
pub use material::{Material, NewMaterialRequest, UpdateMaterialRequest};
pub use school::School;
