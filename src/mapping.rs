//! Conversion between the host's contact shape and Teamleader's
//!
//! Phone labels map through a fixed table. The mapping is asymmetric for
//! `OTHER`: Teamleader has no neutral telephone type, so `OTHER` serializes
//! to an empty type string, which maps back to `OTHER` on the way in.

use crate::api::{VendorContact, VendorEmail, VendorTelephone};
use crate::bridge::{Contact, ContactTemplate, PhoneNumber, PhoneNumberLabel};

const PRIMARY_EMAIL_TYPE: &str = "primary";

/// Convert a Teamleader record to the host shape.
///
/// Returns `None` for records without an id; such entries are skipped, they
/// are not an error.
pub fn vendor_contact_to_contact(vendor: VendorContact) -> Option<Contact> {
    let VendorContact {
        id,
        first_name,
        last_name,
        emails,
        telephones,
        web_url,
    } = vendor;
    let id = id?;

    let email = emails
        .unwrap_or_default()
        .into_iter()
        .find(|entry| entry.kind == PRIMARY_EMAIL_TYPE)
        .map(|entry| entry.email);

    let phone_numbers = telephones
        .into_iter()
        .map(|telephone| PhoneNumber {
            label: phone_label_from_vendor_type(&telephone.kind),
            phone_number: telephone.number,
        })
        .collect();

    Some(Contact {
        id,
        first_name,
        last_name,
        email,
        organization: None,
        contact_url: web_url,
        avatar_url: None,
        phone_numbers,
    })
}

/// Convert host-supplied contact fields to the Teamleader shape.
///
/// `id` is attached only when present; that is how the vendor distinguishes
/// an update from a create. `emails` is only written when an email exists,
/// an empty list would clear the stored addresses.
pub fn contact_to_vendor_contact(contact: &ContactTemplate, id: Option<String>) -> VendorContact {
    let emails = contact.email.clone().map(|email| {
        vec![VendorEmail {
            kind: PRIMARY_EMAIL_TYPE.to_string(),
            email,
        }]
    });

    let telephones = contact
        .phone_numbers
        .iter()
        .map(|phone| VendorTelephone {
            kind: vendor_type_for_phone_label(phone.label).to_string(),
            number: phone.phone_number.clone(),
        })
        .collect();

    VendorContact {
        id,
        first_name: contact.first_name.clone(),
        last_name: contact.last_name.clone(),
        emails,
        telephones,
        web_url: None,
    }
}

fn phone_label_from_vendor_type(kind: &str) -> PhoneNumberLabel {
    match kind {
        "phone" => PhoneNumberLabel::Work,
        "mobile" => PhoneNumberLabel::Mobile,
        "fax" => PhoneNumberLabel::Fax,
        _ => PhoneNumberLabel::Other,
    }
}

fn vendor_type_for_phone_label(label: PhoneNumberLabel) -> &'static str {
    match label {
        PhoneNumberLabel::Work => "phone",
        PhoneNumberLabel::Mobile => "mobile",
        PhoneNumberLabel::Fax => "fax",
        PhoneNumberLabel::Other => "",
    }
}
