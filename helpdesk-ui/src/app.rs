use crate::bridge::{self, LocalStorage};
use crate::pages::{LoginPage, TicketFormPage, TicketListPage};
use helpdesk_core::config::{ClientConfig, API_URL_ENV, REDIRECT_DELAY_ENV, TRANSITIONS_ENV};
use helpdesk_core::{
    AccessGate, ClientError, HttpTicketApi, Resolution, Route, SessionContext, SessionManager,
};
use leptos::*;
use ticket_schema::User;

/// Handles shared by every page. One session context feeds both the API
/// client and the gate.
#[derive(Clone)]
pub struct Shell {
    pub config: ClientConfig,
    pub sessions: SessionManager<LocalStorage>,
    pub api: HttpTicketApi,
    pub gate: AccessGate,
    pub route: RwSignal<Route>,
    pub user: RwSignal<Option<User>>,
}

impl Shell {
    pub fn new() -> Result<Self, ClientError> {
        // Browser builds are configured at compile time.
        let config = ClientConfig::from_lookup(|key| {
            match key {
                API_URL_ENV => option_env!("HELPDESK_API_URL"),
                REDIRECT_DELAY_ENV => option_env!("HELPDESK_REDIRECT_DELAY_MS"),
                TRANSITIONS_ENV => option_env!("HELPDESK_TRANSITIONS"),
                _ => None,
            }
            .map(String::from)
        })?;

        let context = SessionContext::new();
        let sessions = SessionManager::new(LocalStorage, context.clone());
        let restored = sessions.restore().unwrap_or_else(|err| {
            logging::warn!("could not restore session: {err}");
            None
        });

        Ok(Self {
            api: HttpTicketApi::new(config.api_base_url.clone(), context.clone()),
            gate: AccessGate::new(context),
            route: create_rw_signal(Route::Login),
            user: create_rw_signal(restored.map(|s| s.user)),
            sessions,
            config,
        })
    }

    /// Go to `requested`, or wherever the gate sends us instead.
    pub fn navigate(&self, requested: Route) {
        self.user.set(self.sessions.context().user());
        let resolution = self.gate.resolve(requested);
        let to = resolution.route();
        bridge::set_path(to.path(), false);
        self.route.set(to);
    }

    /// Sync the view with the address bar (first load, back/forward).
    pub fn follow_location(&self) {
        let resolution = self.gate.resolve_path(&bridge::current_path());
        if let Resolution::Redirect(to) = resolution {
            bridge::set_path(to.path(), true);
        }
        self.route.set(resolution.route());
    }

    pub fn logout(&self) {
        if let Err(err) = self.sessions.logout() {
            logging::warn!("logout: {err}");
        }
        self.navigate(Route::Login);
    }
}

#[component]
pub fn App() -> impl IntoView {
    match Shell::new() {
        Ok(shell) => view! { <Layout shell=shell/> }.into_view(),
        Err(err) => view! { <pre class="alert alert-danger">{err.to_string()}</pre> }.into_view(),
    }
}

#[component]
fn Layout(shell: Shell) -> impl IntoView {
    shell.follow_location();
    let on_pop = shell.clone();
    let _ = window_event_listener(ev::popstate, move |_| on_pop.follow_location());

    let nav_shell = shell.clone();
    let user = shell.user;
    let route = shell.route;

    view! {
      <nav class="navbar navbar-dark bg-primary mb-4">
        <div class="container">
          <span class="navbar-brand">"Helpdesk"</span>
          <Show when=move || user.get().is_some() fallback=|| ()>
            {
              let to_list = nav_shell.clone();
              let to_create = nav_shell.clone();
              let to_logout = nav_shell.clone();
              view! {
                <div class="d-flex align-items-center gap-2">
                  <button class="btn btn-link text-white" on:click=move |_| to_list.navigate(Route::Tickets)>"Tickets"</button>
                  <button class="btn btn-link text-white" on:click=move |_| to_create.navigate(Route::CreateTicket)>"Create Ticket"</button>
                  <span class="text-white">{move || user.get().map(|u| format!("Welcome, {} ({})", u.name, u.role)).unwrap_or_default()}</span>
                  <button class="btn btn-outline-light btn-sm" on:click=move |_| to_logout.logout()>"Logout"</button>
                </div>
              }
            }
          </Show>
        </div>
      </nav>
      <main class="container">
        {move || match route.get() {
          Route::Login => view! { <LoginPage shell=shell.clone()/> }.into_view(),
          Route::Tickets => view! { <TicketListPage shell=shell.clone()/> }.into_view(),
          Route::CreateTicket => view! { <TicketFormPage shell=shell.clone()/> }.into_view(),
        }}
      </main>
    }
}
