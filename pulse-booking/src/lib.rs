pub mod availability;
pub mod policy;
pub mod resolver;

#[cfg(test)]
pub(crate) mod testing;

pub use availability::{AvailabilityComputer, AvailabilitySlot};
pub use policy::BookingPolicy;
pub use resolver::{
    BookingError, BookingRequest, ConflictReport, ConflictResolver, FreeSlotSuggestion,
    ZoneSuggestion,
};
