// Some prebuilt transfer functions
// for datasets used in development.
// Every dataset needs its own, these are a starting point.

pub mod transfer_functions;
