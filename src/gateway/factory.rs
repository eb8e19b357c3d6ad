use std::time::Duration;
use crate::core::domain::Configuration;
use crate::core::library::LibraryResult;
use crate::gateway::lookup::MetadataLookup;
use crate::gateway::openlibrary::client::OpenLibraryClient;

pub fn create_metadata_lookup(config: &Configuration) -> LibraryResult<Box<dyn MetadataLookup>> {
    let client = OpenLibraryClient::new(
        config.lookup_url.as_str(), Duration::from_secs(config.lookup_timeout_secs))?;
    Ok(Box::new(client))
}
