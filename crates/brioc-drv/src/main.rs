use std::process::exit;

use brioc_drv::{run, Config};

fn main() {
    let config = match Config::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            exit(2);
        }
    };

    match run(&config) {
        Ok(clean) => {
            if !clean {
                exit(1);
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            exit(1);
        }
    }
}
