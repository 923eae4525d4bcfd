//! Turning speech into paint commands.

pub(crate) mod capture;
pub(crate) mod interpret;
