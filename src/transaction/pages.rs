//! The home page and the transaction list page.

use axum::{
    Extension,
    extract::State,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    auth::Session,
    endpoints,
    html::{PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    timezone::format_local_date_time,
    transaction::{TransactionState, summary::summary_placeholder, table::table_placeholder},
};

fn table_section(state: &TransactionState) -> Markup {
    let per_page = state.pagination_config.page_size_or_default(None);
    let view = state.fetch_sequencer.new_view_id();

    html! {
        section class="w-full space-y-4"
        {
            h2 class="text-xl font-semibold text-gray-900 dark:text-white" { "Transaction List" }

            div class="relative w-full overflow-x-auto shadow-md rounded-lg"
            {
                (table_placeholder(per_page, view))
            }
        }
    }
}

fn home_view(session: &Session, state: &TransactionState) -> Markup {
    let nav_bar = NavBar::new(endpoints::HOME_VIEW, session.role, &session.user_name).into_html();
    let last_login = session
        .last_login_at
        .as_deref()
        .map(|timestamp| format_local_date_time(timestamp, &state.local_timezone))
        .unwrap_or_else(|| "N/A".to_owned());

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full space-y-6"
            {
                div class="flex flex-col gap-1 md:flex-row md:items-end md:justify-between"
                {
                    h1 class="text-2xl font-bold text-gray-900 dark:text-white" { "Transaction Overview" }

                    p id="last-login" class="text-sm text-gray-500 dark:text-gray-400"
                    {
                        "Last Login Time: " (last_login)
                    }
                }

                (summary_placeholder())

                (table_section(state))
            }
        }
    };

    base("Home", &content)
}

fn transactions_view(session: &Session, state: &TransactionState) -> Markup {
    let nav_bar =
        NavBar::new(endpoints::TRANSACTIONS_VIEW, session.role, &session.user_name).into_html();

    let content = html! {
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            (table_section(state))
        }
    };

    base("Transactions", &content)
}

/// Display the summary cards, the last login time and the transaction table.
pub async fn get_home_page(
    State(state): State<TransactionState>,
    Extension(session): Extension<Session>,
) -> Response {
    home_view(&session, &state).into_response()
}

/// Display the transaction table.
pub async fn get_transactions_page(
    State(state): State<TransactionState>,
    Extension(session): Extension<Session>,
) -> Response {
    transactions_view(&session, &state).into_response()
}
