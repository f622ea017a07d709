//! HTML rendering for the title listing
//!
//! Addresses and titles are written as-is; titles may contain raw markup
//! captured from the fetched page.

use crate::fetch::FetchResult;
use std::fmt::Write;

/// Body sent when the request carries no `address` parameter
pub const NO_ADDRESSES_PAGE: &str =
    "<html><body><h1>Error: No addresses provided</h1></body></html>";

/// Body sent when a batch could not be completed
pub const INTERNAL_ERROR_PAGE: &str = "<html><body><h1>Internal Server Error</h1></body></html>";

/// Body sent for unknown routes
pub const NOT_FOUND_BODY: &str = "Not Found";

/// Renders the result list page
///
/// # Example
///
/// ```
/// use title_scout::fetch::{FetchResult, PageTitle};
/// use title_scout::server::render_titles;
///
/// let page = render_titles(&[FetchResult {
///     address: "example.com".to_string(),
///     title: PageTitle::Extracted("Example Domain".to_string()),
/// }]);
/// assert!(page.contains(r#"<li> example.com - "Example Domain" </li>"#));
/// ```
pub fn render_titles(results: &[FetchResult]) -> String {
    let mut html = String::from(
        "<html>\n<head></head>\n<body>\n\n    <h1> Following are the titles of given websites: </h1>\n\n    <ul>",
    );

    for result in results {
        // Writing into a String cannot fail.
        let _ = write!(
            html,
            "\n       <li> {} - \"{}\" </li>",
            result.address, result.title
        );
    }

    html.push_str("\n    </ul>\n</body>\n</html>");
    html
}
