fn main() {
    workgraph::cli::run();
}
