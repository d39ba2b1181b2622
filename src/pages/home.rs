use leptos::prelude::*;
use log::error;

use crate::api;
use crate::components::ontology_graph::{ClickBinding, EngineConfig, GraphData, OntologyGraphCanvas};
use crate::error::GraphError;

/// Fetches the graph and shows it with `config`.
#[component]
pub fn Home(#[prop(optional)] config: EngineConfig) -> impl IntoView {
	let (graph, set_graph) = signal(None::<Result<GraphData, GraphError>>);

	leptos::task::spawn_local(async move {
		let result = api::fetch_graph(api::GRAPH_DATA_URL).await;
		if let Err(ref e) = result {
			error!("graph view not rendered: {e}");
		}
		set_graph.set(Some(result));
	});

	let hint = match config.click {
		ClickBinding::ToggleTag => {
			"Click a node to tag it. Drag nodes to reposition. Scroll to zoom. Drag background to pan."
		}
		ClickBinding::ContextMenu => {
			"Right-click a node for options. Drag nodes to reposition. Scroll to zoom. Drag background to pan."
		}
	};

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<Show when=move || graph.with(Option::is_none)>
					<p class="status">"Loading graph…"</p>
				</Show>
				{move || {
					graph
						.get()
						.map(|result| {
							result
								.map(|data| {
									let data = Signal::derive(move || data.clone());
									view! {
										<OntologyGraphCanvas data=data config=config.clone() fullscreen=true />
									}
								})
						})
				}}
				<div class="graph-overlay">
					<h1>"Ontology Graph"</h1>
					<p class="subtitle">{hint}</p>
				</div>
			</div>
		</ErrorBoundary>
	}
}
