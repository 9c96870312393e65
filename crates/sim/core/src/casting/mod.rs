//! Active/queued slot bookkeeping for one actor.
mod slots;

pub use slots::{Admission, AdmissionPolicy, Advance, CastSlots};
