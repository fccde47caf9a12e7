fn main() {
    std::process::exit(conveyor::app::startup::startup());
}
