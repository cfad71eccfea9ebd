mod support;
mod type_graph;
