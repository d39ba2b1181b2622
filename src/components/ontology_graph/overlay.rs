use leptos::ev;
use leptos::prelude::*;
use web_sys::MouseEvent;

use super::interaction::{MenuAction, NodeDetails, PanelDrag};

/// What the context menu needs to label its entries.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuView {
	pub x: f64,
	pub y: f64,
	pub collapsed: bool,
	pub tagged: bool,
	pub leaf: bool,
}

/// Requests from the overlays, applied to the view context by the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum OverlayCommand {
	Menu(MenuAction),
	CloseMenu,
}

#[component]
pub fn ContextMenuView(
	menu: RwSignal<Option<MenuView>>,
	command: RwSignal<Option<OverlayCommand>>,
) -> impl IntoView {
	let send = move |c: OverlayCommand| command.set(Some(c));

	move || {
		menu.get().map(|m| {
			let style = format!("left: {}px; top: {}px;", m.x + 5.0, m.y - 5.0);
			view! {
				<div class="context-menu" style=style on:contextmenu=|ev: MouseEvent| ev.prevent_default()>
					{(!m.leaf)
						.then(|| {
							view! {
								<div
									class="context-menu-item"
									on:click=move |_| send(OverlayCommand::Menu(MenuAction::ToggleCollapse))
								>
									{if m.collapsed { "Expand children" } else { "Collapse children" }}
								</div>
							}
						})}
					<div
						class="context-menu-item"
						on:click=move |_| send(OverlayCommand::Menu(MenuAction::ToggleTag))
					>
						{if m.tagged { "Remove tag" } else { "Tag" }}
					</div>
					<div
						class="context-menu-item"
						on:click=move |_| send(OverlayCommand::Menu(MenuAction::ShowInfo))
					>
						"Node info"
					</div>
					<div class="context-menu-item close" on:click=move |_| send(OverlayCommand::CloseMenu)>
						"Close"
					</div>
				</div>
			}
		})
	}
}

/// Non-modal node info panel, dragged by its header.
#[component]
pub fn InfoPanel(info: RwSignal<Option<NodeDetails>>, panel: RwSignal<PanelDrag>) -> impl IntoView {
	let move_handle = window_event_listener(ev::mousemove, move |ev| {
		if panel.with_untracked(PanelDrag::is_grabbed) {
			ev.prevent_default();
			panel.update(|p| {
				p.drag(ev.page_x() as f64, ev.page_y() as f64);
			});
		}
	});
	let up_handle = window_event_listener(ev::mouseup, move |_| {
		if panel.with_untracked(PanelDrag::is_grabbed) {
			panel.update(PanelDrag::release);
		}
	});
	on_cleanup(move || {
		move_handle.remove();
		up_handle.remove();
	});

	move || {
		info.get().map(|d| {
			let parent = d
				.parent
				.map(|(id, label)| format!("{id} ({label})"))
				.unwrap_or_else(|| "none (root)".into());
			let child_count = d.children.len();
			let children = d
				.children
				.into_iter()
				.map(|(id, label)| view! { <li>{format!("{id} ({label})")}</li> })
				.collect_view();

			view! {
				<div
					class="info-panel"
					style=move || {
						let (x, y) = panel.get().offset;
						format!("transform: translate({x}px, {y}px);")
					}
				>
					<div
						class="info-panel-header"
						on:mousedown=move |ev: MouseEvent| {
							ev.prevent_default();
							panel.update(|p| p.grab(ev.page_x() as f64, ev.page_y() as f64));
						}
					>
						<span class="info-panel-title">"Node info"</span>
						<span class="info-panel-close" on:click=move |_| info.set(None)>
							"×"
						</span>
					</div>
					<div class="info-panel-body">
						<p><strong>"ID: "</strong>{d.id}</p>
						<p><strong>"Label: "</strong>{d.label}</p>
						<p><strong>"Depth: "</strong>{d.depth}</p>
						<p><strong>"Parent: "</strong>{parent}</p>
						<p><strong>"Children: "</strong>{child_count}</p>
						<ul>{children}</ul>
					</div>
				</div>
			}
		})
	}
}
