use bot_commons::start_everything;

fn main() {
    start_everything(
        "WARN,group_manager_bot=debug,bot_commons=info",
        group_manager_bot::entry(),
    );
}
