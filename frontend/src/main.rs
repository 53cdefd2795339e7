use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use astrocade_machines::registry;
use astrocade_machines::rom_loader::Checksums;
use clap::Parser;

mod config;
mod rom_path;
mod script;

use config::Config;

/// Drive an Astrocade arcade board from the command line.
#[derive(Debug, Parser)]
#[command(name = "astrocade", version)]
struct Cli {
    /// Game to load (e.g. wow, profpac).
    #[arg(required_unless_present = "list")]
    machine: Option<String>,

    /// ROM zip, or a directory holding `<game>.zip`.
    rom_path: Option<PathBuf>,

    /// Bus-access script to run against the board.
    #[arg(long)]
    script: Option<PathBuf>,

    /// Config file (default: the platform config dir).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Accept ROM images whose CRC32 does not match.
    #[arg(long)]
    skip_checksums: bool,

    /// Log filter, e.g. `debug` or `astrocade_machines=trace`.
    #[arg(long)]
    log_level: Option<String>,

    /// List the supported games and exit.
    #[arg(long)]
    list: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };

    let mut logger = env_logger::Builder::from_default_env();
    if let Some(filter) = cli.log_level.as_deref().or(config.log_level.as_deref()) {
        logger.parse_filters(filter);
    }
    logger.init();

    if cli.list {
        for entry in registry::all() {
            println!("{:<10} {}", entry.name, entry.description);
        }
        return Ok(());
    }

    let Some(machine_name) = cli.machine.as_deref() else {
        bail!("no machine given");
    };
    let Some(entry) = registry::find(machine_name) else {
        let names: Vec<_> = registry::all().iter().map(|e| e.name).collect();
        bail!(
            "unknown machine '{machine_name}' (available: {})",
            names.join(", ")
        );
    };

    let Some(rom_path) = cli.rom_path.clone().or_else(|| config.rom_path.clone()) else {
        bail!("no ROM path given and none set in the config file");
    };
    let checksums = if cli.skip_checksums || config.skip_checksums {
        Checksums::Skip
    } else {
        Checksums::Verify
    };

    let rom_set = rom_path::load_rom_set(entry.rom_name, &rom_path)
        .with_context(|| format!("loading ROMs for {machine_name}"))?;
    let mut machine = (entry.create)(&rom_set, checksums)
        .with_context(|| format!("building {machine_name}"))?;
    log::info!("loaded {} ({})", entry.name, entry.description);

    let nvram_path = nvram_path_for(machine_name, &rom_path, config.nvram_dir.as_deref());
    if let Ok(data) = std::fs::read(&nvram_path) {
        log::info!("restoring NVRAM from {}", nvram_path.display());
        machine.load_nvram(&data);
    }
    machine.reset();

    let mut stdout = std::io::stdout().lock();
    match &cli.script {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading script {}", path.display()))?;
            let commands = script::parse(&text)
                .with_context(|| format!("parsing script {}", path.display()))?;
            script::run(machine.as_mut(), &commands, &mut stdout)?;
        }
        None => script::describe_machine(machine.as_ref(), &mut stdout)?,
    }

    if let Some(data) = machine.save_nvram()
        && let Err(e) = std::fs::write(&nvram_path, data)
    {
        log::warn!("failed to save NVRAM to {}: {e}", nvram_path.display());
    }
    Ok(())
}

fn nvram_path_for(machine_name: &str, rom_path: &Path, nvram_dir: Option<&Path>) -> PathBuf {
    let file = format!("{machine_name}.nvram");
    match nvram_dir {
        Some(dir) => dir.join(file),
        None if rom_path.is_dir() => rom_path.join(file),
        None => rom_path.with_extension("nvram"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn list_does_not_need_a_machine() {
        let cli = Cli::try_parse_from(["astrocade", "--list"]).unwrap();
        assert!(cli.list);
        assert!(cli.machine.is_none());
        assert!(Cli::try_parse_from(["astrocade"]).is_err());
    }

    #[test]
    fn nvram_lives_beside_the_roms() {
        assert_eq!(
            nvram_path_for("robby", Path::new("/roms/robby.zip"), None),
            PathBuf::from("/roms/robby.nvram")
        );
        assert_eq!(
            nvram_path_for("robby", Path::new("/roms/robby.zip"), Some(Path::new("/nv"))),
            PathBuf::from("/nv/robby.nvram")
        );
    }
}
