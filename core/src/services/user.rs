//! Organization members: list all, or look one up by id.

use serde::Deserialize;

use crate::client::Client;
use crate::error::ApiError;
use crate::graphql::NoVariables;
use crate::input::ById;
use crate::services::OrganizationData;
use crate::transport::Transport;
use crate::types::User;

pub(crate) const LIST_USERS: &str = "query {
  organization {
    users {
      id name description email title type
      avatar { original thumb }
      insertedAt updatedAt deactivatedAt
    }
  }
}";

pub(crate) const GET_USER: &str = "query ($id: ID!) {
  user(id: $id) {
    id name description email title type
    avatar { original thumb }
    insertedAt updatedAt deactivatedAt
  }
}";

#[derive(Debug, Deserialize)]
struct UsersField {
    users: Vec<User>,
}

#[derive(Debug, Deserialize)]
struct UserData {
    user: Option<User>,
}

/// Read-only access to organization members.
pub struct UserService<'a, T> {
    client: &'a Client<T>,
}

impl<'a, T: Transport> UserService<'a, T> {
    pub(crate) fn new(client: &'a Client<T>) -> Self {
        Self { client }
    }

    pub fn list(&self) -> Result<Vec<User>, ApiError> {
        let data: OrganizationData<UsersField> =
            self.client.execute(LIST_USERS, &NoVariables {})?;
        Ok(data.organization.users)
    }

    pub fn get(&self, id: &str) -> Result<User, ApiError> {
        let data: UserData = self.client.execute(GET_USER, &ById { id })?;
        data.user.ok_or(ApiError::NotFound)
    }
}
