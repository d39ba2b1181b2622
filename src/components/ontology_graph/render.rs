use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::ViewContext;

pub fn render(state: &ViewContext, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(&state.config().palette.background);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_links(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_links(state: &ViewContext, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let arrow_size = 6.0;
	let color = &state.config().palette.link;
	ctx.set_stroke_style_str(color);
	ctx.set_fill_style_str(color);

	for seg in &state.frame().links {
		let (dx, dy) = (seg.x2 - seg.x1, seg.y2 - seg.y1);
		let dist = dx.hypot(dy);
		if dist < 0.001 {
			continue;
		}
		let visual = state.visuals.links[seg.link];
		let target = state.forest.links()[seg.link].target;
		let target_radius = state.visuals.nodes[target].radius;

		ctx.set_global_alpha(visual.opacity);
		ctx.set_line_width(visual.width);
		let _ = if visual.dimmed {
			ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(4.0 / k),
				&JsValue::from_f64(3.0 / k),
			))
		} else {
			ctx.set_line_dash(&js_sys::Array::new())
		};

		let (ux, uy) = (dx / dist, dy / dist);
		let has_arrow = dist > target_radius + arrow_size * 2.0;
		let end = if has_arrow {
			target_radius + arrow_size
		} else {
			target_radius.min(dist)
		};
		ctx.begin_path();
		ctx.move_to(seg.x1, seg.y1);
		ctx.line_to(seg.x2 - ux * end, seg.y2 - uy * end);
		ctx.stroke();

		if has_arrow {
			let (tip_x, tip_y) = (seg.x2 - ux * target_radius, seg.y2 - uy * target_radius);
			let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
			let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
			ctx.begin_path();
			ctx.move_to(tip_x, tip_y);
			ctx.line_to(back_x + px, back_y + py);
			ctx.line_to(back_x - px, back_y - py);
			ctx.close_path();
			ctx.fill();
		}
	}
	ctx.set_global_alpha(1.0);
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

fn draw_nodes(state: &ViewContext, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let palette = &state.config().palette;
	ctx.set_font(&format!("{}px sans-serif", 12.0 / k.max(0.5)));

	for pos in &state.frame().nodes {
		let visual = &state.visuals.nodes[pos.idx];
		ctx.begin_path();
		let _ = ctx.arc(pos.x, pos.y, visual.radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&visual.fill);
		ctx.fill();
		ctx.set_stroke_style_str(&palette.background);
		ctx.set_line_width(1.5 / k);
		ctx.stroke();

		if visual.label_opacity > 0.0 {
			ctx.set_global_alpha(visual.label_opacity);
			ctx.set_fill_style_str(&palette.label);
			let label = &state.forest.node(pos.idx).label;
			let _ = ctx.fill_text(label, pos.x + visual.radius + 2.0, pos.y + 4.0);
			ctx.set_global_alpha(1.0);
		}
	}
}
