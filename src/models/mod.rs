mod city;
mod contact_method;
mod person;
mod trip;

pub use city::City;
pub use contact_method::{ContactMethod, Platform};
pub use person::{MissingInfo, NewPerson, Person, Tier};
pub use trip::{Trip, TripSource};
