use std::io;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;

use hotelsql::{AppConfig, Args, Console, HotelError, PgGateway, RenderMode, Session};

fn greeting() {
    println!(
        "\n*******************************************************\n\
         *           Hotel Management Console                 *\n\
         *******************************************************\n"
    );
}

fn main() -> ExitCode {
    env_logger::init_from_env(Env::default().default_filter_or("warn"));

    let args = Args::parse();
    let config = AppConfig::load(&args);

    greeting();
    println!(
        "Connecting to {}:{} (database {}, user {})...",
        config.host, config.port, config.dbname, config.user
    );

    let gateway = match PgGateway::connect(&config) {
        Ok(gateway) => {
            println!("Done");
            gateway
        }
        Err(err) => {
            eprintln!("{err}");
            eprintln!(
                "Make sure PostgreSQL is reachable at {}:{}",
                config.host, config.port
            );
            return ExitCode::FAILURE;
        }
    };

    let console = match Console::new() {
        Ok(console) => console,
        Err(err) => {
            eprintln!("{err}");
            let _ = gateway.close();
            return ExitCode::FAILURE;
        }
    };

    let mode = if config.pretty {
        RenderMode::Pretty
    } else {
        RenderMode::Plain
    };
    let mut session = Session::new(gateway, console, io::stdout(), mode);
    let outcome = session.run();

    // The connection is released exactly once here, on every exit path.
    let (gateway, mut console, _) = session.into_parts();
    console.save_history();
    print!("Disconnecting from database...");
    if let Err(err) = gateway.close() {
        log::warn!("error while closing connection: {err}");
    }
    println!("Done\n\nBye !");

    match outcome {
        Ok(()) | Err(HotelError::InputClosed) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
