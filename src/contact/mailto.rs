use super::form::ContactRequest;

/// Builds the `mailto:` draft opened when the contact API is unreachable.
pub fn mailto_uri(address: &str, subject: &str, request: &ContactRequest) -> String {
    let body = format!(
        "Name: {}\nEmail: {}\n\n{}",
        request.name, request.email, request.message
    );

    format!(
        "mailto:{}?subject={}&body={}",
        address,
        urlencoding::encode(subject),
        urlencoding::encode(&body)
    )
}
