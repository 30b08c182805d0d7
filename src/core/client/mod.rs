// HTTP plumbing towards the data service
pub mod endpoints;
pub mod reqwest_transport;
pub mod transport;

#[cfg(test)]
pub(crate) mod mock_transport;
