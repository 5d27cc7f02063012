//! Contact operations against an authorized access token
//!
//! Each function here runs under a single access token so
//! [`with_reauthorization`](crate::auth::with_reauthorization) can retry the
//! whole unit after a token refresh. Create and update read the stored
//! record back via `contacts.info` instead of echoing the input.

use crate::api::TeamleaderClient;
use crate::bridge::{Contact, ContactTemplate, ContactUpdate};
use crate::error::{AdapterError, Result};
use crate::mapping::{contact_to_vendor_contact, vendor_contact_to_contact};

/// Fetch every contact, page by page.
///
/// Pagination is strictly sequential and stops at the first empty page.
/// Records without an id are skipped. A vendor failure mid-pagination is an
/// error, partial results are never returned.
pub async fn fetch_all_contacts(
    client: &TeamleaderClient,
    access_token: &str,
) -> Result<Vec<Contact>> {
    let mut contacts = Vec::new();
    let mut page = 1;

    loop {
        let batch = client.list_contacts_page(access_token, page).await?;
        if batch.is_empty() {
            break;
        }
        contacts.extend(batch.into_iter().filter_map(vendor_contact_to_contact));
        page += 1;
    }

    Ok(contacts)
}

/// Create a contact and return the stored record.
pub async fn create_contact(
    client: &TeamleaderClient,
    access_token: &str,
    template: &ContactTemplate,
) -> Result<Contact> {
    let vendor = contact_to_vendor_contact(template, None);
    let id = client.add_contact(access_token, &vendor).await?;
    fetch_single_contact(client, access_token, &id).await
}

/// Update a contact and return the stored record. The id travels inside the
/// payload, the way the vendor expects it.
pub async fn update_contact(
    client: &TeamleaderClient,
    access_token: &str,
    update: &ContactUpdate,
) -> Result<Contact> {
    let vendor = contact_to_vendor_contact(&update.contact, Some(update.id.clone()));
    client.update_contact(access_token, &vendor).await?;
    fetch_single_contact(client, access_token, &update.id).await
}

/// Delete a contact by id.
pub async fn delete_contact(
    client: &TeamleaderClient,
    access_token: &str,
    id: &str,
) -> Result<()> {
    client.delete_contact(access_token, id).await
}

async fn fetch_single_contact(
    client: &TeamleaderClient,
    access_token: &str,
    id: &str,
) -> Result<Contact> {
    let vendor = client.get_contact(access_token, id).await?;
    vendor_contact_to_contact(vendor).ok_or_else(|| {
        AdapterError::MappingFailed(format!("contact {id} came back without an id"))
    })
}
