pub mod checkin;
pub mod envelope;
pub mod health;
pub mod schedule;

#[cfg(test)]
pub(crate) mod test_support;
