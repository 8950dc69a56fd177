use clap::Parser;

#[derive(Debug, Parser, Clone)]
#[command(name = "vayu-tui", version, about = "Terminal air quality dashboard")]
pub struct Cli {
    /// City name to start from (skips location detection)
    pub city: Option<String>,

    /// Direct latitude, used as the device fix (requires --lon)
    #[arg(long)]
    pub lat: Option<f64>,

    /// Direct longitude, used as the device fix (requires --lat)
    #[arg(long)]
    pub lon: Option<f64>,

    /// Auto-refresh interval in seconds
    #[arg(long, default_value_t = 600)]
    pub refresh_interval: u64,

    /// Use the public demo provider tokens when the env vars are unset
    #[arg(long)]
    pub dev_keys: bool,

    /// Override the WAQI API base URL
    #[arg(long)]
    pub waqi_url: Option<String>,

    /// Override the OpenWeather API base URL (geocoding and air pollution)
    #[arg(long)]
    pub openweather_url: Option<String>,

    /// Override IP geolocation endpoints (repeatable, tried in order)
    #[arg(long = "ip-lookup-url")]
    pub ip_lookup_urls: Vec<String>,
}

impl Cli {
    pub fn validate(&self) -> anyhow::Result<()> {
        match (self.lat, self.lon) {
            (Some(_), None) | (None, Some(_)) => {
                anyhow::bail!("--lat and --lon must be provided together")
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::Cli;

    #[test]
    fn parses_city_positional() {
        let cli = Cli::parse_from(["vayu-tui", "Bhopal"]);
        assert_eq!(cli.city.as_deref(), Some("Bhopal"));
        assert_eq!(cli.refresh_interval, 600);
        assert!(!cli.dev_keys);
    }

    #[test]
    fn collects_repeated_ip_lookup_urls_in_order() {
        let cli = Cli::parse_from([
            "vayu-tui",
            "--ip-lookup-url",
            "http://a.test/json",
            "--ip-lookup-url",
            "http://b.test/json",
        ]);
        assert_eq!(
            cli.ip_lookup_urls,
            vec!["http://a.test/json", "http://b.test/json"]
        );
    }

    #[test]
    fn lat_without_lon_fails_validation() {
        let cli = Cli::parse_from(["vayu-tui", "--lat", "23.18"]);
        assert!(cli.validate().is_err());

        let cli = Cli::parse_from(["vayu-tui", "--lat", "23.18", "--lon", "79.98"]);
        assert!(cli.validate().is_ok());
    }
}
