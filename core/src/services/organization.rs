//! The organization the API token belongs to, fetched with a shallow selection.

use crate::client::Client;
use crate::error::ApiError;
use crate::graphql::NoVariables;
use crate::services::OrganizationData;
use crate::transport::Transport;
use crate::types::Organization;

/// Shallow selection: nested posts, topics and users carry only enough to
/// identify them, keeping the payload bounded.
pub(crate) const GET_ORGANIZATION: &str = "query {
  organization {
    id
    host
    name
    posts { id title }
    topics { id name description posts { id title } }
    users { id name }
    insertedAt
    updatedAt
  }
}";

/// Read access to the organization the token belongs to.
pub struct OrganizationService<'a, T> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> OrganizationService<'a, T> {
    pub(crate) fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    pub fn get(&self) -> Result<Organization, ApiError> {
        let data: OrganizationData<Organization> =
            self.client.execute(GET_ORGANIZATION, &NoVariables {})?;
        Ok(data.organization)
    }
}
