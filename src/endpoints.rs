//! The API endpoint URIs.
//!
//! For endpoints that take a parameter, e.g., '/api/v1/budgets/{budget_id}', use [format_endpoint].

/// The health check.
pub const ROOT: &str = "/";

/// The route for registering a new user.
pub const SIGN_UP: &str = "/api/v1/auth/signup";
/// The route for signing in and getting a bearer token.
pub const SIGN_IN: &str = "/api/v1/auth/signin";
/// The route for signing out.
pub const SIGN_OUT: &str = "/api/v1/auth/signout";

/// The route for the signed in user's profile.
pub const PROFILE: &str = "/api/v1/users/profile";

/// The route to list and create categories.
pub const CATEGORIES: &str = "/api/v1/categories";
/// The route to access a single category.
pub const CATEGORY: &str = "/api/v1/categories/{category_id}";

/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/v1/transactions";
/// The route to access a single transaction.
pub const TRANSACTION: &str = "/api/v1/transactions/{transaction_id}";

/// The route to list and create budgets.
pub const BUDGETS: &str = "/api/v1/budgets";
/// The route to access a single budget.
pub const BUDGET: &str = "/api/v1/budgets/{budget_id}";

/// The route for the signed in user's settings.
pub const SETTINGS: &str = "/api/v1/settings";

/// Expense totals by category.
pub const SPENDING_ANALYTICS: &str = "/api/v1/analytics/spending";
/// Income totals by category.
pub const INCOME_ANALYTICS: &str = "/api/v1/analytics/income";
/// Income and expense totals per month.
pub const MONTHLY_TRENDS: &str = "/api/v1/analytics/monthly-trends";
/// The data for the dashboard charts.
pub const CHARTS: &str = "/api/v1/analytics/charts";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    use super::format_endpoint;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::SIGN_UP);
        assert_endpoint_is_valid_uri(endpoints::SIGN_IN);
        assert_endpoint_is_valid_uri(endpoints::SIGN_OUT);
        assert_endpoint_is_valid_uri(endpoints::PROFILE);
        assert_endpoint_is_valid_uri(endpoints::CATEGORIES);
        assert_endpoint_is_valid_uri(endpoints::TRANSACTIONS);
        assert_endpoint_is_valid_uri(endpoints::BUDGETS);
        assert_endpoint_is_valid_uri(endpoints::SETTINGS);
        assert_endpoint_is_valid_uri(endpoints::SPENDING_ANALYTICS);
        assert_endpoint_is_valid_uri(endpoints::INCOME_ANALYTICS);
        assert_endpoint_is_valid_uri(endpoints::MONTHLY_TRENDS);
        assert_endpoint_is_valid_uri(endpoints::CHARTS);

        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::CATEGORY, 1));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::TRANSACTION, 2));
        assert_endpoint_is_valid_uri(&format_endpoint(endpoints::BUDGET, 3));
    }

    #[test]
    fn formats_resource_endpoints() {
        assert_eq!(format_endpoint(endpoints::BUDGET, 42), "/api/v1/budgets/42");
    }

    #[test]
    fn produces_valid_uri() {
        let formatted_path = format_endpoint("/hello/{world_id}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());

        // Parameter with single word should also work.
        let formatted_path = format_endpoint("/hello/{world}", 1);

        assert_eq!(formatted_path, "/hello/1");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn returns_original_path_with_no_parameter() {
        let formatted_path = format_endpoint("/hello/world", 1);

        assert_eq!(formatted_path, "/hello/world");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }

    #[test]
    fn parameter_in_middle() {
        let formatted_path = format_endpoint("/hello/{world}/bye", 1);

        assert_eq!(formatted_path, "/hello/1/bye");
        assert!(formatted_path.parse::<Uri>().is_ok());
    }
}
