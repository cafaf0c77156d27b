//! Contacts API endpoint

use crate::{
    client::Client,
    error::{Error, Result},
    http::Endpoint,
    types::{Contact, ContactList},
};

/// Default page requested by [`Contacts::list`].
pub const DEFAULT_PAGE: u32 = 1;

/// Default page size requested by [`Contacts::list`].
pub const DEFAULT_LIMIT: u32 = 10;

/// Contacts API resource.
#[derive(Clone, Copy)]
pub struct Contacts<'a> {
    client: &'a Client,
}

impl<'a> Contacts<'a> {
    /// Create a new Contacts resource.
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Fetch one contact by id.
    pub async fn get(&self, id: &str) -> Result<Contact> {
        self.client.get(&contact_path(id)).await?.into_typed()
    }

    /// List one page of contacts.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use octadesk::{Client, ListContactsParams};
    ///
    /// # async fn example(client: Client) -> octadesk::Result<()> {
    /// let params = ListContactsParams::default()
    ///     .limit(50)
    ///     .filter("tags", "vip");
    ///
    /// for contact in client.contacts().list(&params).await? {
    ///     println!("{:?}", contact.name);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn list(&self, params: &ListContactsParams) -> Result<Vec<Contact>> {
        let endpoint = Endpoint::get("/contacts")
            .query("page", params.page)
            .query("limit", params.limit)
            .query_all(params.filters.iter().map(|(k, v)| (k.as_str(), v)));

        let list: ContactList = self.client.execute(endpoint).await?.into_typed()?;
        Ok(list.into_items())
    }

    /// Create a contact.
    pub async fn create(&self, contact: &Contact) -> Result<Contact> {
        self.client.post("/contacts", contact).await?.into_typed()
    }

    /// Partially update a contact; only the fields that are set are sent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] without calling the API if the
    /// contact has no id.
    pub async fn update(&self, contact: &Contact) -> Result<Contact> {
        let path = contact_path(require_id(contact)?);
        self.client.patch(&path, contact).await?.into_typed()
    }

    /// Replace a contact with the given record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidRequest`] without calling the API if the
    /// contact has no id.
    pub async fn replace(&self, contact: &Contact) -> Result<Contact> {
        let path = contact_path(require_id(contact)?);
        self.client.put(&path, contact).await?.into_typed()
    }
}

/// Query for [`Contacts::list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListContactsParams {
    /// 1-based page number
    pub page: u32,
    /// Page size
    pub limit: u32,
    /// Extra query parameters, sent as given after `page` and `limit`
    pub filters: Vec<(String, String)>,
}

impl Default for ListContactsParams {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            filters: Vec::new(),
        }
    }
}

impl ListContactsParams {
    /// Set the page number.
    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Set the page size.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    /// Add a filter parameter.
    pub fn filter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push((key.into(), value.to_string()));
        self
    }
}

fn contact_path(id: &str) -> String {
    format!("/contacts/{}", id)
}

fn require_id(contact: &Contact) -> Result<&str> {
    contact
        .id
        .as_deref()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| Error::InvalidRequest("contact id is required".to_string()))
}
