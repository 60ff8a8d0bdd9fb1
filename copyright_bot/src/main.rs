use bot_commons::start_everything;

fn main() {
    start_everything(
        "WARN,copyright_bot=debug,bot_commons=info",
        copyright_bot::entry(),
    );
}
