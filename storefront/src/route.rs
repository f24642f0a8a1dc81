//! Storefront URL table.
//!
//! [`Route::parse`] and [`Route::path`] are inverse: every route with
//! non-empty parameters renders to a path that parses back to the same route.
//! Parameters are percent-encoded, so ids may contain `/`, `?` or `#`.
//! Unmatched paths become [`Route::NotFound`].

use crate::types::TransactionId;
use std::borrow::Cow;
use std::fmt;

/// A client-side route
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`
    Home,
    /// `/cart`
    Cart,
    /// `/checkout`
    Checkout,
    /// `/signup`
    Signup,
    /// `/login`
    Login,
    /// `/activate/:uid/:token`
    Activate {
        /// Encoded user id
        uid: String,
        /// Activation token
        token: String,
    },
    /// `/reset_password`
    ResetPassword,
    /// `/password/reset/confirm/:uid/:token`
    ResetPasswordConfirm {
        /// Encoded user id
        uid: String,
        /// Reset token
        token: String,
    },
    /// `/shop`
    Shop,
    /// `/product/:product_id`
    Product {
        /// Catalogue id
        product_id: String,
    },
    /// `/search`
    Search,
    /// `/thankyou`
    ThankYou,
    /// `/dashboard`
    Dashboard,
    /// `/dashboard/payments`
    DashboardPayments,
    /// `/dashboard/payment/:transaction_id`
    DashboardPayment {
        /// The order to show
        transaction_id: TransactionId,
    },
    /// `/dashboard/profile`
    DashboardProfile,
    /// `/dashboard_employee`
    EmployeeDashboard,
    /// `/dashboard_employee_product`
    EmployeeProducts,
    /// `/dashboard_employee_newproduct`
    EmployeeNewProduct,
    /// `/dashboard_employee_product/:product_id`
    EmployeeProduct {
        /// Catalogue id
        product_id: String,
    },
    /// `/searchProduct`
    SearchProduct,
    /// `/searchOrder`
    SearchOrder,
    /// Anything else
    NotFound {
        /// The unmatched path as given
        path: String,
    },
}

impl Route {
    /// Matches a path against the route table
    ///
    /// A single trailing slash is ignored and empty parameters never match.
    #[must_use]
    pub fn parse(path: &str) -> Self {
        if path.contains("//") {
            return Self::not_found(path);
        }
        let trimmed = path.strip_suffix('/').filter(|p| !p.is_empty()).unwrap_or(path);
        let segments: Vec<&str> = trimmed.strip_prefix('/').map_or_else(Vec::new, |rest| {
            if rest.is_empty() {
                Vec::new()
            } else {
                rest.split('/').collect()
            }
        });

        if !trimmed.starts_with('/') || segments.iter().any(|s| s.is_empty()) {
            return Self::not_found(path);
        }

        let route = match segments.as_slice() {
            [] => Some(Self::Home),
            ["cart"] => Some(Self::Cart),
            ["checkout"] => Some(Self::Checkout),
            ["signup"] => Some(Self::Signup),
            ["login"] => Some(Self::Login),
            ["activate", uid, token] => decode(uid)
                .zip(decode(token))
                .map(|(uid, token)| Self::Activate { uid, token }),
            ["reset_password"] => Some(Self::ResetPassword),
            ["password", "reset", "confirm", uid, token] => decode(uid)
                .zip(decode(token))
                .map(|(uid, token)| Self::ResetPasswordConfirm { uid, token }),
            ["shop"] => Some(Self::Shop),
            ["product", id] => decode(id).map(|product_id| Self::Product { product_id }),
            ["search"] => Some(Self::Search),
            ["thankyou"] => Some(Self::ThankYou),
            ["dashboard"] => Some(Self::Dashboard),
            ["dashboard", "payments"] => Some(Self::DashboardPayments),
            ["dashboard", "payment", id] => decode(id).map(|id| Self::DashboardPayment {
                transaction_id: TransactionId::new(id),
            }),
            ["dashboard", "profile"] => Some(Self::DashboardProfile),
            ["dashboard_employee"] => Some(Self::EmployeeDashboard),
            ["dashboard_employee_product"] => Some(Self::EmployeeProducts),
            ["dashboard_employee_newproduct"] => Some(Self::EmployeeNewProduct),
            ["dashboard_employee_product", id] => {
                decode(id).map(|product_id| Self::EmployeeProduct { product_id })
            },
            ["searchProduct"] => Some(Self::SearchProduct),
            ["searchOrder"] => Some(Self::SearchOrder),
            _ => None,
        };

        route.unwrap_or_else(|| Self::not_found(path))
    }

    fn not_found(path: &str) -> Self {
        Self::NotFound {
            path: path.to_string(),
        }
    }

    /// Renders the route back to its path
    #[must_use]
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::Cart => "/cart".to_string(),
            Self::Checkout => "/checkout".to_string(),
            Self::Signup => "/signup".to_string(),
            Self::Login => "/login".to_string(),
            Self::Activate { uid, token } => format!("/activate/{}/{}", encode(uid), encode(token)),
            Self::ResetPassword => "/reset_password".to_string(),
            Self::ResetPasswordConfirm { uid, token } => {
                format!("/password/reset/confirm/{}/{}", encode(uid), encode(token))
            },
            Self::Shop => "/shop".to_string(),
            Self::Product { product_id } => format!("/product/{}", encode(product_id)),
            Self::Search => "/search".to_string(),
            Self::ThankYou => "/thankyou".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::DashboardPayments => "/dashboard/payments".to_string(),
            Self::DashboardPayment { transaction_id } => {
                format!("/dashboard/payment/{}", encode(transaction_id.as_str()))
            },
            Self::DashboardProfile => "/dashboard/profile".to_string(),
            Self::EmployeeDashboard => "/dashboard_employee".to_string(),
            Self::EmployeeProducts => "/dashboard_employee_product".to_string(),
            Self::EmployeeNewProduct => "/dashboard_employee_newproduct".to_string(),
            Self::EmployeeProduct { product_id } => {
                format!("/dashboard_employee_product/{}", encode(product_id))
            },
            Self::SearchProduct => "/searchProduct".to_string(),
            Self::SearchOrder => "/searchOrder".to_string(),
            Self::NotFound { path } => path.clone(),
        }
    }

    /// Whether the route needs a signed-in session
    #[must_use]
    pub const fn requires_session(&self) -> bool {
        matches!(
            self,
            Self::Dashboard
                | Self::DashboardPayments
                | Self::DashboardPayment { .. }
                | Self::DashboardProfile
                | Self::EmployeeDashboard
                | Self::EmployeeProducts
                | Self::EmployeeNewProduct
                | Self::EmployeeProduct { .. }
        )
    }
}

/// Percent-encodes one path parameter
fn encode(segment: &str) -> Cow<'_, str> {
    urlencoding::encode(segment)
}

/// Decodes one path parameter; invalid UTF-8 and empty values never match
fn decode(segment: &str) -> Option<String> {
    urlencoding::decode(segment)
        .ok()
        .filter(|value| !value.is_empty())
        .map(Cow::into_owned)
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn every_route() -> Vec<Route> {
        vec![
            Route::Home,
            Route::Cart,
            Route::Checkout,
            Route::Signup,
            Route::Login,
            Route::Activate {
                uid: "MQ".to_string(),
                token: "abc-123".to_string(),
            },
            Route::ResetPassword,
            Route::ResetPasswordConfirm {
                uid: "MQ".to_string(),
                token: "tok".to_string(),
            },
            Route::Shop,
            Route::Product {
                product_id: "42".to_string(),
            },
            Route::Search,
            Route::ThankYou,
            Route::Dashboard,
            Route::DashboardPayments,
            Route::DashboardPayment {
                transaction_id: TransactionId::new("TX1"),
            },
            Route::DashboardProfile,
            Route::EmployeeDashboard,
            Route::EmployeeProducts,
            Route::EmployeeNewProduct,
            Route::EmployeeProduct {
                product_id: "7".to_string(),
            },
            Route::SearchProduct,
            Route::SearchOrder,
        ]
    }

    #[test]
    fn path_and_parse_are_inverse() {
        for route in every_route() {
            assert_eq!(Route::parse(&route.path()), route, "{route}");
        }
    }

    #[test]
    fn payment_detail_carries_transaction_id() {
        assert_eq!(
            Route::parse("/dashboard/payment/TX1"),
            Route::DashboardPayment {
                transaction_id: TransactionId::new("TX1")
            }
        );
        assert_eq!(Route::parse("/dashboard/payments/"), Route::DashboardPayments);
    }

    #[test]
    fn reserved_characters_in_ids_survive_round_trip() {
        for id in ["a/b", "TX1?x", "TX#2", "50%", "año 2024"] {
            let payment = Route::DashboardPayment {
                transaction_id: TransactionId::new(id),
            };
            let product = Route::Product {
                product_id: id.to_string(),
            };
            let activate = Route::Activate {
                uid: id.to_string(),
                token: id.to_string(),
            };
            for route in [payment, product, activate] {
                let path = route.path();
                assert!(!path.contains(['?', '#', ' ']), "{path}");
                assert_eq!(Route::parse(&path), route, "{path}");
            }
        }
        assert_eq!(
            Route::DashboardPayment {
                transaction_id: TransactionId::new("a/b?c#d")
            }
            .path(),
            "/dashboard/payment/a%2Fb%3Fc%23d"
        );
    }

    #[test]
    fn empty_or_undecodable_ids_never_match() {
        let empty = Route::DashboardPayment {
            transaction_id: TransactionId::new(""),
        };
        assert!(matches!(Route::parse(&empty.path()), Route::NotFound { .. }));
        assert!(matches!(Route::parse("/product/%FF"), Route::NotFound { .. }));
        assert!(matches!(
            Route::parse("/activate//token"),
            Route::NotFound { .. }
        ));
    }

    #[test]
    fn unmatched_paths_are_not_found() {
        for path in ["/dashboard/payment", "/dashboard/payment/", "/nope", "cart", "", "//"] {
            let route = Route::parse(path);
            assert_eq!(
                route,
                Route::NotFound {
                    path: path.to_string()
                },
                "{path:?}"
            );
        }
    }

    #[test]
    fn dashboard_routes_require_session() {
        assert!(Route::parse("/dashboard/payment/TX1").requires_session());
        assert!(Route::parse("/dashboard_employee").requires_session());
        assert!(!Route::Home.requires_session());
        assert!(!Route::Shop.requires_session());
    }
}
