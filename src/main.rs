use anyhow::Result;
use outpost::uci::UciHandler;

fn main() -> Result<()> {
    UciHandler::new().run()
}
