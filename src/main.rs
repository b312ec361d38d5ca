use anyhow::Result;
use nimbus_core::{AppError, Config, ConfigError};
use nimbus_ui::WeatherScreen;
use tokio::io::{AsyncBufReadExt, BufReader};

const HELP: &str = "Type a city name to search, :r to refresh, :q to quit.";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    nimbus_core::init()?;

    let (config, _validation) = match Config::load_validated() {
        Ok(loaded) => loaded,
        Err(e) => {
            let err = ConfigError::Invalid(format!("{:#}", e));
            eprintln!("{}", err.user_message());
            eprintln!(
                "Set weather.api_key in {} or export {}",
                Config::config_path()?.display(),
                nimbus_core::API_KEY_ENV
            );
            return Err(AppError::from(err).into());
        }
    };

    let mut screen = WeatherScreen::from_config(&config)?;
    screen.controller_mut().initialize();
    screen.controller_mut().settle().await;
    show(&mut screen);

    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let controller = screen.controller_mut();
        match line.trim() {
            ":q" | ":quit" => break,
            ":r" | ":refresh" => controller.refresh(),
            ":h" | ":help" => {
                println!("{}", HELP);
                continue;
            }
            query => {
                controller.set_search_text(query);
                if !controller.submit_search() {
                    continue;
                }
            }
        }
        controller.settle().await;
        show(&mut screen);
    }

    tracing::info!("Nimbus shutting down");
    Ok(())
}

fn show(screen: &mut WeatherScreen) {
    for notice in screen.controller_mut().take_notices() {
        println!("! {}", notice);
    }
    print!("{}", screen.render());
}
