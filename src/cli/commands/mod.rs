pub mod admin;
pub mod auth;
pub mod notes;
pub mod open;
pub mod user;

use clap::ValueEnum;

use crate::cli::utils::output_error;
use crate::cli::Console;
use crate::error::ClientError;
use crate::query::{ListQuery, QueryError, SortDirection};
use crate::routes::Route;

/// Print a backend or transport failure and turn it into the command's error.
pub(crate) fn client_failure(console: &Console, error: ClientError) -> anyhow::Error {
    if let Err(e) = output_error(&console.output, &error.user_message(), Some(error.error_code())) {
        tracing::warn!("could not print error: {}", e);
    }
    anyhow::Error::new(error)
}

/// Run the route guard for a protected command.
pub(crate) async fn require(console: &Console, route: Route) -> anyhow::Result<()> {
    if console.enter(&route).await? {
        Ok(())
    } else {
        Err(anyhow::anyhow!("{} is not available; sign in with an account that may open it", route))
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Order {
    Asc,
    Desc,
}

impl From<Order> for SortDirection {
    fn from(order: Order) -> Self {
        match order {
            Order::Asc => SortDirection::Asc,
            Order::Desc => SortDirection::Desc,
        }
    }
}

/// Apply `--sort`/`--order`. A bare `--order` re-orders the current sort field.
pub(crate) fn apply_sort(
    query: &mut ListQuery,
    sort: Option<&str>,
    order: Option<Order>,
) -> Result<(), QueryError> {
    let field = match (sort, order) {
        (Some(field), _) => field.to_string(),
        (None, Some(_)) => query.sort().map(|s| s.field.clone()).ok_or(QueryError::NoSortField)?,
        (None, None) => return Ok(()),
    };
    let direction = order.map(SortDirection::from).unwrap_or(SortDirection::Desc);
    query.set_sort(&field, direction)
}
