fn main() {
    std::process::exit(route_manager::cli::run_from(std::env::args_os()));
}
