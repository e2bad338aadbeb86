mod entry;
mod logger;

use stochast::error::AppResult;

fn main() -> AppResult<()> {
    entry::run()
}
