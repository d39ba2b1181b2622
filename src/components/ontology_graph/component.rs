use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::html::Canvas;
use leptos::prelude::*;
use log::error;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::config::EngineConfig;
use super::interaction::{MenuAction, NodeDetails, PanelDrag};
use super::overlay::{ContextMenuView, InfoPanel, MenuView, OverlayCommand};
use super::render;
use super::state::ViewContext;
use super::types::GraphData;

type SharedView = Rc<RefCell<Option<ViewContext>>>;

fn canvas_point(canvas_ref: NodeRef<Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

fn menu_view(s: &ViewContext) -> Option<MenuView> {
	s.menu.map(|m| {
		let node = s.forest.node(m.node);
		MenuView {
			x: m.x,
			y: m.y,
			collapsed: node.collapsed,
			tagged: node.tagged,
			leaf: node.is_leaf(),
		}
	})
}

fn prompt_color() -> Option<String> {
	web_sys::window()?
		.prompt_with_message("Colour for the tagged node (e.g. red or #FF0000), blank for the default:")
		.ok()
		.flatten()
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

#[component]
pub fn OntologyGraphCanvas(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(optional)] config: EngineConfig,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<Canvas>::new();
	let state: SharedView = Rc::new(RefCell::new(None));
	let dirty = Rc::new(Cell::new(true));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, dirty_init, animate_init, resize_cb_init) = (
		state.clone(),
		dirty.clone(),
		animate.clone(),
		resize_cb.clone(),
	);

	let menu = RwSignal::new(None::<MenuView>);
	let info = RwSignal::new(None::<NodeDetails>);
	let panel = RwSignal::new(PanelDrag::default());
	let command = RwSignal::new(None::<OverlayCommand>);

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = match (fullscreen, window_size(&window)) {
			(true, Some(size)) => size,
			_ => (
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			),
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
			Ok(Some(ctx)) => match ctx.dyn_into() {
				Ok(ctx) => ctx,
				Err(_) => return,
			},
			_ => {
				error!("canvas has no 2d context");
				return;
			}
		};
		let mut view = match ViewContext::new(&data.get(), config.clone(), w, h) {
			Ok(view) => view,
			Err(e) => {
				error!("graph view not rendered: {e}");
				return;
			}
		};
		let dirty_tick = dirty_init.clone();
		view.on_tick(move |_| dirty_tick.set(true));
		*state_init.borrow_mut() = Some(view);
		dirty_init.set(true);

		if fullscreen {
			let (state_resize, dirty_resize, canvas_resize) =
				(state_init.clone(), dirty_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
				dirty_resize.set(true);
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, dirty_anim, animate_inner) =
			(state_init.clone(), dirty_init.clone(), animate_init.clone());
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				if !s.is_settled() {
					s.tick(0.016);
				}
				if dirty_anim.replace(false) {
					render::render(s, &ctx);
				}
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let (state_cmd, dirty_cmd) = (state.clone(), dirty.clone());
	Effect::new(move |_| {
		let Some(cmd) = command.get() else {
			return;
		};
		if let Some(ref mut s) = *state_cmd.borrow_mut() {
			match cmd {
				OverlayCommand::CloseMenu => s.close_menu(),
				OverlayCommand::Menu(action) => {
					let tagging = action == MenuAction::ToggleTag
						&& s.menu.is_some_and(|m| !s.forest.node(m.node).tagged);
					let color = if tagging { prompt_color() } else { None };
					let anchor = s.menu.map(|m| (m.x, m.y));
					if let Some(details) = s.apply_menu_action(action, color) {
						if let Some((x, y)) = anchor {
							panel.update(|p| p.open_at(x, y));
						}
						info.set(Some(details));
					}
				}
			}
			dirty_cmd.set(true);
		}
		menu.set(None);
	});

	let (state_md, dirty_md) = (state.clone(), dirty.clone());
	let on_mousedown = move |ev: MouseEvent| {
		if ev.button() != 0 {
			return;
		}
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_md.borrow_mut() {
			let had_menu = s.menu.is_some();
			s.pointer_down(x, y);
			if had_menu && s.menu.is_none() {
				menu.set(None);
			}
			dirty_md.set(true);
		}
	};

	let (state_mm, dirty_mm) = (state.clone(), dirty.clone());
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			s.pointer_move(x, y);
			if s.pan.active {
				dirty_mm.set(true);
			}
		}
	};

	let (state_mu, dirty_mu) = (state.clone(), dirty.clone());
	let on_mouseup = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			s.pointer_up();
			dirty_mu.set(true);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.pointer_leave();
		}
	};

	let (state_wh, dirty_wh) = (state.clone(), dirty.clone());
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_wh.borrow_mut() {
			s.zoom(x, y, ev.delta_y());
			dirty_wh.set(true);
		}
	};

	let state_cm = state.clone();
	let on_contextmenu = move |ev: MouseEvent| {
		ev.prevent_default();
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};
		if let Some(ref mut s) = *state_cm.borrow_mut() {
			s.open_menu(x, y, ev.page_x() as f64, ev.page_y() as f64);
			menu.set(menu_view(s));
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="ontology-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:contextmenu=on_contextmenu
			style="display: block; cursor: grab;"
		/>
		<ContextMenuView menu=menu command=command />
		<InfoPanel info=info panel=panel />
	}
}
