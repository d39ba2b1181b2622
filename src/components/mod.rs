pub mod ontology_graph;
