use crate::app::Shell;
use crate::bridge::WindowConfirm;
use helpdesk_core::badge::{Badge, priority_badge, status_badge};
use helpdesk_core::effect::{Confirm, Effectful, TicketCommand};
use helpdesk_core::views::login::DEMO_ACCOUNTS;
use helpdesk_core::views::{LoginForm, StatusFilter, TicketForm, TicketListView};
use helpdesk_core::{TicketApi, ViewScope};
use leptos::*;
use ticket_schema::{Priority, Ticket, User};

/// A scope that closes when the owning component is torn down.
fn mount_scope() -> ViewScope {
    let scope = ViewScope::new();
    let on_drop = scope.clone();
    on_cleanup(move || on_drop.close());
    scope
}

fn badge_view(badge: Badge) -> impl IntoView {
    view! { <span class=format!("badge {}", badge.style.css_class())>{badge.label}</span> }
}

#[component]
pub fn LoginPage(shell: Shell) -> impl IntoView {
    let form = create_rw_signal(LoginForm::new());
    let scope = mount_scope();

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let Some(Some(credentials)) = form.try_update(|f| f.begin_submit()) else {
            return;
        };
        let shell = shell.clone();
        let scope = scope.clone();
        spawn_local(async move {
            let Some(result) = scope.guard(shell.sessions.login(&shell.api, &credentials)).await else {
                return;
            };
            if let Some(Some(next)) = form.try_update(|f| f.finish_submit(&result)) {
                shell.navigate(next);
            }
        });
    };

    view! {
      <div class="row justify-content-center">
        <div class="col-md-5">
          <h2 class="mb-3">"Login"</h2>
          <Show when=move || form.with(|f| f.error().is_some()) fallback=|| ()>
            <div class="alert alert-danger d-flex justify-content-between">
              <span>{move || form.with(|f| f.error().unwrap_or_default().to_string())}</span>
              <button type="button" class="btn-close" on:click=move |_| form.update(|f| f.dismiss_error())></button>
            </div>
          </Show>
          <form on:submit=submit>
            <input
              class="form-control mb-2"
              type="email"
              placeholder="Email"
              prop:value=move || form.with(|f| f.email.clone())
              on:input=move |ev| form.update(|f| f.email = event_target_value(&ev))
            />
            <input
              class="form-control mb-2"
              type="password"
              placeholder="Password"
              prop:value=move || form.with(|f| f.password.clone())
              on:input=move |ev| form.update(|f| f.password = event_target_value(&ev))
            />
            <button class="btn btn-primary w-100" type="submit" prop:disabled=move || form.with(|f| f.in_flight())>
              {move || if form.with(|f| f.in_flight()) { "Logging in..." } else { "Login" }}
            </button>
          </form>
          <div class="mt-3 text-muted small">
            <div>"Demo credentials:"</div>
            {DEMO_ACCOUNTS
              .into_iter()
              .map(|(label, email, password)| view! { <div>{format!("{label}: {email} / {password}")}</div> })
              .collect_view()}
          </div>
        </div>
      </div>
    }
}

#[component]
pub fn TicketListPage(shell: Shell) -> impl IntoView {
    let view_state = create_rw_signal(TicketListView::new(shell.config.transition_policy));
    let user = shell.user;
    let handles = store_value((shell, mount_scope()));

    let refresh = move || {
        let (shell, scope) = handles.get_value();
        view_state.update(|v| v.begin_fetch());
        spawn_local(async move {
            if let Some(result) = scope.guard(shell.api.list_tickets()).await {
                view_state.update(|v| v.finish_fetch(result));
            }
        });
    };

    let run = move |command: TicketCommand| {
        if !view_state.with_untracked(|v| v.is_enabled(&command)) {
            return;
        }
        if let Some(prompt) = command.confirmation_prompt() {
            if command.effect().requires_confirmation() && !WindowConfirm.confirm(prompt) {
                return;
            }
        }
        let (shell, scope) = handles.get_value();
        spawn_local(async move {
            match scope.guard(command.send(&shell.api)).await {
                None => {}
                Some(Ok(())) if command.effect().invalidates_list() => refresh(),
                Some(Ok(())) => {}
                Some(Err(err)) => view_state.update(|v| v.record_failure(&command, &err)),
            }
        });
    };

    refresh();

    let filter_buttons = StatusFilter::ALL
        .into_iter()
        .map(|filter| {
            let class = move || {
                if view_state.with(|v| v.filter() == filter) {
                    "btn btn-sm btn-primary"
                } else {
                    "btn btn-sm btn-outline-primary"
                }
            };
            view! {
              <button class=class on:click=move |_| view_state.update(|v| v.set_filter(filter))>
                {filter.label()}
              </button>
            }
        })
        .collect_view();

    view! {
      <div class="d-flex justify-content-between align-items-center mb-3">
        <h2>"Tickets"</h2>
        <div class="btn-group">{filter_buttons}</div>
      </div>
      <Show when=move || view_state.with(|v| v.error().is_some()) fallback=|| ()>
        <div class="alert alert-danger d-flex justify-content-between">
          <span>{move || view_state.with(|v| v.error().unwrap_or_default().to_string())}</span>
          <button type="button" class="btn-close" on:click=move |_| view_state.update(|v| v.dismiss_error())></button>
        </div>
      </Show>
      {move || {
        if view_state.with(|v| v.loading()) {
          return view! { <div class="text-center">"Loading tickets..."</div> }.into_view();
        }
        if let Some(message) = view_state.with(|v| v.empty_message()) {
          return view! { <div class="alert alert-info">{message}</div> }.into_view();
        }
        let viewer = user.get().unwrap_or_else(|| User {
          email: String::new(),
          name: String::new(),
          role: ticket_schema::Role::User,
        });
        view_state
          .with(|v| v.visible().into_iter().cloned().collect::<Vec<_>>())
          .into_iter()
          .map(|ticket| ticket_card(ticket, &viewer, view_state, run))
          .collect_view()
      }}
    }
}

fn ticket_card(
    ticket: Ticket,
    viewer: &User,
    view_state: RwSignal<TicketListView>,
    run: impl Fn(TicketCommand) + Copy + 'static,
) -> View {
    let actions = view_state.with_untracked(|v| v.actions(&ticket, viewer));
    let can_delete = actions.can_delete;
    let id = ticket.id;

    let transition_buttons = actions
        .transitions
        .into_iter()
        .map(|(action, enabled)| {
            let status = action.target();
            view! {
              <button
                class="btn btn-sm btn-outline-secondary me-1"
                prop:disabled=!enabled
                on:click=move |_| run(TicketCommand::SetStatus { id, status })
              >
                {action.label()}
              </button>
            }
        })
        .collect_view();

    view! {
      <div class="card mb-3">
        <div class="card-body">
          <div class="d-flex justify-content-between">
            <h5 class="card-title">{ticket.title.clone()}</h5>
            <div>
              {badge_view(status_badge(ticket.status))}
              " "
              {badge_view(priority_badge(ticket.priority))}
            </div>
          </div>
          <p class="card-text">{ticket.description.clone()}</p>
          <div class="text-muted small mb-2">
            {format!("Created by {} on {}", ticket.created_by, ticket.created_at)}
          </div>
          <div>
            {transition_buttons}
            <Show when=move || can_delete fallback=|| ()>
              <button class="btn btn-sm btn-danger" on:click=move |_| run(TicketCommand::Delete { id })>
                "Delete"
              </button>
            </Show>
          </div>
        </div>
      </div>
    }
    .into_view()
}

#[component]
pub fn TicketFormPage(shell: Shell) -> impl IntoView {
    let form = create_rw_signal(TicketForm::new());
    let scope = mount_scope();
    let delay = shell.config.redirect_delay;
    let handles = store_value((shell, scope));

    let submit = move |ev: ev::SubmitEvent| {
        ev.prevent_default();
        let Some(Some(ticket)) = form.try_update(|f| f.begin_submit()) else {
            return;
        };
        let (shell, scope) = handles.get_value();
        spawn_local(async move {
            let Some(result) = scope.guard(shell.api.create_ticket(&ticket)).await else {
                return;
            };
            let Some(Some(redirect)) = form.try_update(|f| f.finish_submit(result, delay)) else {
                return;
            };
            set_timeout(
                move || {
                    if scope.is_alive() {
                        shell.navigate(redirect.to);
                    }
                },
                redirect.after,
            );
        });
    };

    let cancel = move |_: ev::MouseEvent| {
        if let Some(to) = form.with_untracked(|f| f.cancel()) {
            handles.with_value(|(shell, _)| shell.navigate(to));
        }
    };

    let priority_options = Priority::ALL
        .into_iter()
        .map(|p| {
            view! {
              <option value=p.as_str() selected=move || form.with(|f| f.priority == p)>
                {p.label()}
              </option>
            }
        })
        .collect_view();

    view! {
      <div class="row justify-content-center">
        <div class="col-md-8">
          <h2 class="mb-3">"Create Ticket"</h2>
          <Show when=move || form.with(|f| f.success().is_some()) fallback=|| ()>
            <div class="alert alert-success d-flex justify-content-between">
              <span>{move || form.with(|f| f.success().unwrap_or_default().to_string())}</span>
              <button type="button" class="btn-close" on:click=move |_| form.update(|f| f.dismiss_success())></button>
            </div>
          </Show>
          <Show when=move || form.with(|f| f.error().is_some()) fallback=|| ()>
            <div class="alert alert-danger d-flex justify-content-between">
              <span>{move || form.with(|f| f.error().unwrap_or_default().to_string())}</span>
              <button type="button" class="btn-close" on:click=move |_| form.update(|f| f.dismiss_error())></button>
            </div>
          </Show>
          <form on:submit=submit>
            <input
              class="form-control mb-2"
              placeholder="Title"
              prop:value=move || form.with(|f| f.title.clone())
              on:input=move |ev| form.update(|f| f.title = event_target_value(&ev))
            />
            <textarea
              class="form-control mb-2"
              rows="4"
              placeholder="Description"
              prop:value=move || form.with(|f| f.description.clone())
              on:input=move |ev| form.update(|f| f.description = event_target_value(&ev))
            ></textarea>
            <select
              class="form-select mb-3"
              on:change=move |ev| {
                if let Ok(priority) = event_target_value(&ev).parse::<Priority>() {
                  form.update(|f| f.priority = priority);
                }
              }
            >
              {priority_options}
            </select>
            <div class="d-flex gap-2">
              <button class="btn btn-primary" type="submit" prop:disabled=move || form.with(|f| f.in_flight())>
                {move || if form.with(|f| f.in_flight()) { "Creating..." } else { "Create Ticket" }}
              </button>
              <button
                class="btn btn-secondary"
                type="button"
                prop:disabled=move || form.with(|f| f.in_flight())
                on:click=cancel
              >
                "Cancel"
              </button>
            </div>
          </form>
        </div>
      </div>
    }
}
