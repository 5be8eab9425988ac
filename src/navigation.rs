//! This file defines the templates and a convenience function for creating the navigation bar.

use maud::{Markup, html};

use crate::{auth::Role, endpoints};

/// Template for a link in the navigation bar.
///
/// It will change appearance if `is_current` is set to
/// `true`. Only one link should be set as active at any one time.
#[derive(Clone)]
struct Link<'a> {
    url: &'a str,
    title: &'a str,
    is_current: bool,
}

impl Link<'_> {
    fn into_desktop_html(self) -> Markup {
        let style = if self.is_current {
            "block py-2 px-3 text-white bg-blue-700 rounded-sm lg:bg-transparent
        lg:text-blue-700 lg:p-0 dark:text-white lg:dark:text-blue-500"
        } else {
            "block py-2 px-3 text-gray-900 rounded-sm hover:bg-gray-100
        lg:hover:bg-transparent lg:border-0 lg:hover:text-blue-700 lg:p-0
        dark:text-white lg:dark:hover:text-blue-500 dark:hover:bg-gray-700
        dark:hover:text-white lg:dark:hover:bg-transparent"
        };

        html!(
            a
                href=(self.url)
                class=(style)
                aria-current=[self.is_current.then_some("page")]
            {
                (self.title)
            }
        )
    }

    fn into_mobile_html(self) -> Markup {
        let style = if self.is_current {
            "flex w-full min-w-0 items-center justify-center rounded-lg \
            bg-blue-50 px-2.5 py-2 text-xs font-semibold leading-tight \
            text-blue-700 shadow-sm sm:px-4 sm:text-sm \
            dark:bg-blue-900/30 dark:text-blue-200"
        } else {
            "flex w-full min-w-0 items-center justify-center rounded-lg \
            px-2.5 py-2 text-xs font-semibold leading-tight text-gray-600 \
            sm:px-4 sm:text-sm \
            hover:bg-blue-50/70 hover:text-blue-700 dark:text-gray-300 \
            dark:hover:bg-blue-900/20 dark:hover:text-blue-200"
        };

        html!(
            a
                href=(self.url)
                class=(style)
                aria-current=[self.is_current.then_some("page")]
            {
                span class="truncate" { (self.title) }
            }
        )
    }
}

pub struct NavBar<'a> {
    links: Vec<Link<'a>>,
    user_name: &'a str,
}

impl<'a> NavBar<'a> {
    /// Get the navigation bar for a user with `role`.
    ///
    /// Approvers do not create transactions, so they do not get that link.
    /// If a link matches `active_endpoint`, then that link will be
    /// marked as active and displayed differently in the HTML.
    pub fn new(active_endpoint: &str, role: Role, user_name: &'a str) -> NavBar<'a> {
        let pages: &[(&'a str, &'a str)] = if role.is_approver() {
            &[
                (endpoints::HOME_VIEW, "Home"),
                (endpoints::TRANSACTIONS_VIEW, "Transaction List"),
            ]
        } else {
            &[
                (endpoints::HOME_VIEW, "Home"),
                (endpoints::CREATE_TRANSACTION_VIEW, "Create Transaction"),
                (endpoints::TRANSACTIONS_VIEW, "Transaction List"),
            ]
        };

        let links = pages
            .iter()
            .map(|&(url, title)| Link {
                url,
                title,
                is_current: active_endpoint == url,
            })
            .collect();

        NavBar { links, user_name }
    }

    pub fn into_html(self) -> Markup {
        let links = self.links;
        let column_count = links.len();

        // Template adapted from https://flowbite.com/docs/components/navbar/#default-navbar
        html!(
            nav class="bg-white border-gray-200 dark:bg-gray-900"
            {
                div
                    class="max-w-screen-xl flex flex-wrap items-center justify-between mx-auto p-4"
                {
                    a
                        href=(endpoints::HOME_VIEW)
                        class="flex items-center space-x-3 rtl:space-x-reverse"
                    {
                        span
                            class="self-center text-2xl font-semibold whitespace-nowrap dark:text-white"
                        {
                            "Batch Transfer Console"
                        }
                    }

                    div class="hidden w-full lg:block lg:w-auto"
                    {
                        ul
                            class="font-medium flex flex-col p-4 lg:p-0 mt-4
                            border border-gray-100 rounded bg-gray-50
                            lg:flex-row lg:space-x-8 rtl:space-x-reverse lg:mt-0
                            lg:border-0 lg:bg-white dark:bg-gray-800
                            lg:dark:bg-gray-900 dark:border-gray-700"
                        {
                            @for link in links.clone().into_iter() {
                                li { (link.into_desktop_html()) }
                            }
                        }
                    }

                    div class="flex items-center gap-4"
                    {
                        span
                            id="nav-user-name"
                            class="text-sm font-medium text-gray-700 dark:text-gray-300"
                        {
                            (self.user_name)
                        }

                        a
                            href=(endpoints::LOG_OUT)
                            id="log-out-link"
                            class="px-3 py-1.5 text-sm font-medium text-gray-900 border
                            border-gray-300 rounded hover:bg-gray-100 dark:text-white
                            dark:border-gray-600 dark:hover:bg-gray-700"
                        {
                            "Log out"
                        }
                    }
                }
            }

            nav class="fixed inset-x-0 bottom-0 z-40 lg:hidden"
            {
                div class="mx-auto max-w-screen-xl px-4 pb-4"
                {
                    div
                        class="rounded-xl border border-gray-200 bg-white/95
                        shadow-lg backdrop-blur dark:border-gray-700 dark:bg-gray-900/95"
                    {
                        ul
                            class=(format!("grid grid-cols-{column_count} gap-2 px-4 py-3 \
                            text-xs font-semibold text-gray-600 dark:text-gray-300"))
                            aria-label="Primary"
                        {
                            @for link in links.into_iter() {
                                li class="min-w-0" { (link.into_mobile_html()) }
                            }
                        }
                    }
                }
            }
        )
    }
}

#[cfg(test)]
mod nav_bar_tests {
    use std::collections::HashMap;

    use scraper::{Html, Selector};

    use crate::{auth::Role, endpoints, navigation::NavBar};

    #[test]
    fn approver_gets_home_and_transaction_list() {
        let nav_bar = NavBar::new(endpoints::HOME_VIEW, Role::Approver, "Alice");

        let titles: Vec<&str> = nav_bar.links.iter().map(|link| link.title).collect();

        assert_eq!(titles, ["Home", "Transaction List"]);
    }

    #[test]
    fn other_roles_can_create_transactions() {
        for role in [Role::Maker, Role::Other] {
            let nav_bar = NavBar::new(endpoints::HOME_VIEW, role, "Bob");

            let titles: Vec<&str> = nav_bar.links.iter().map(|link| link.title).collect();

            assert_eq!(
                titles,
                ["Home", "Create Transaction", "Transaction List"],
                "wrong links for {role:?}"
            );
        }
    }

    #[test]
    fn set_active_endpoint() {
        let mut cases = HashMap::new();
        cases.insert(endpoints::HOME_VIEW, true);
        cases.insert(endpoints::TRANSACTIONS_VIEW, true);
        cases.insert(endpoints::CREATE_TRANSACTION_VIEW, true);

        cases.insert(endpoints::ROOT, false);
        cases.insert(endpoints::INTERNAL_ERROR_VIEW, false);
        cases.insert(endpoints::LOG_IN_API, false);
        cases.insert(endpoints::LOG_IN_VIEW, false);
        cases.insert(endpoints::LOG_OUT, false);
        cases.insert(endpoints::REGISTER_VIEW, false);
        cases.insert(endpoints::TRANSACTION_TABLE, false);

        for (endpoint, should_be_active) in cases {
            let nav_bar = NavBar::new(endpoint, Role::Maker, "Bob");

            assert_link_active(nav_bar, endpoint, should_be_active);
        }
    }

    #[test]
    fn shows_user_name_and_log_out() {
        let markup = NavBar::new(endpoints::HOME_VIEW, Role::Maker, "Bob Maker").into_html();

        let html = Html::parse_fragment(&markup.into_string());
        let user_name = html
            .select(&Selector::parse("#nav-user-name").unwrap())
            .next()
            .expect("No user name found");
        assert_eq!(user_name.text().collect::<String>().trim(), "Bob Maker");
        let log_out = html
            .select(&Selector::parse("#log-out-link").unwrap())
            .next()
            .expect("No log out link found");
        assert_eq!(log_out.value().attr("href"), Some(endpoints::LOG_OUT));
    }

    #[track_caller]
    fn assert_link_active(nav_bar: NavBar<'_>, endpoint: &str, should_be_active: bool) {
        let get_active_string = |is_active: bool| -> &str {
            if is_active {
                "active (true)"
            } else {
                "inactive (false)"
            }
        };

        for link in nav_bar.links {
            if link.url == endpoint {
                assert_eq!(
                    link.is_current,
                    should_be_active,
                    "Link for current page should be {} but got {}",
                    get_active_string(should_be_active),
                    get_active_string(link.is_current),
                )
            } else {
                assert!(
                    !link.is_current,
                    "Link for inactive page should {} but got {}",
                    get_active_string(false),
                    get_active_string(link.is_current)
                )
            }
        }
    }
}
