//! Bus-access scripts.
//!
//! One command per line; `#` starts a comment. Numbers are decimal, or hex
//! with a `0x` or `$` prefix.
//!
//! ```text
//! read ADDR            write ADDR VALUE       main CPU program space
//! in PORT              out PORT VALUE         main CPU I/O space
//! sub-read ADDR        sub-write ADDR VALUE   sound CPU program space
//! sub-in PORT          sub-out PORT VALUE     sound CPU I/O space
//! press BUTTON         release BUTTON         button by name or id
//! port NAME VALUE                             overwrite a named input port
//! save FILE            load FILE              JSON save states
//! reset
//! ```

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, bail};
use astrocade_core::core::machine::Machine;
use astrocade_core::core::{Bus, BusMaster, SaveState, SpaceId};
use astrocade_core::device::OutputEvent;
use thiserror::Error;

const MAIN_CPU: BusMaster = BusMaster::Cpu(0);
const SOUND_CPU: BusMaster = BusMaster::Cpu(1);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Read { cpu: BusMaster, space: SpaceId, addr: u16 },
    Write { cpu: BusMaster, space: SpaceId, addr: u16, data: u8 },
    Press(String),
    Release(String),
    Port { name: String, value: u8 },
    Save(PathBuf),
    Load(PathBuf),
    Reset,
}

fn parse_number(token: &str) -> Option<u32> {
    if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .or_else(|| token.strip_prefix('$'))
    {
        u32::from_str_radix(hex, 16).ok()
    } else {
        token.parse().ok()
    }
}

fn parse_u16(token: &str) -> Result<u16, String> {
    parse_number(token)
        .and_then(|n| u16::try_from(n).ok())
        .ok_or_else(|| format!("bad address '{token}'"))
}

fn parse_u8(token: &str) -> Result<u8, String> {
    parse_number(token)
        .and_then(|n| u8::try_from(n).ok())
        .ok_or_else(|| format!("bad byte '{token}'"))
}

fn parse_line(text: &str) -> Result<Option<Command>, String> {
    let text = text.split('#').next().unwrap_or_default().trim();
    let tokens: Vec<&str> = text.split_whitespace().collect();
    let Some((&verb, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let access = |cpu: BusMaster, space: SpaceId| -> Result<Command, String> {
        match args {
            [addr] => Ok(Command::Read {
                cpu,
                space,
                addr: parse_u16(addr)?,
            }),
            _ => Err(format!("'{verb}' takes one address")),
        }
    };
    let store = |cpu: BusMaster, space: SpaceId| -> Result<Command, String> {
        match args {
            [addr, data] => Ok(Command::Write {
                cpu,
                space,
                addr: parse_u16(addr)?,
                data: parse_u8(data)?,
            }),
            _ => Err(format!("'{verb}' takes an address and a byte")),
        }
    };
    // Button names may contain spaces ("P1 Start").
    let rest = || -> Result<String, String> {
        if args.is_empty() {
            Err(format!("'{verb}' needs an argument"))
        } else {
            Ok(args.join(" "))
        }
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "read" => access(MAIN_CPU, SpaceId::Program)?,
        "write" => store(MAIN_CPU, SpaceId::Program)?,
        "in" => access(MAIN_CPU, SpaceId::Io)?,
        "out" => store(MAIN_CPU, SpaceId::Io)?,
        "sub-read" => access(SOUND_CPU, SpaceId::Program)?,
        "sub-write" => store(SOUND_CPU, SpaceId::Program)?,
        "sub-in" => access(SOUND_CPU, SpaceId::Io)?,
        "sub-out" => store(SOUND_CPU, SpaceId::Io)?,
        "press" => Command::Press(rest()?),
        "release" => Command::Release(rest()?),
        "port" => match args {
            [name, value] => Command::Port {
                name: (*name).to_string(),
                value: parse_u8(value)?,
            },
            _ => return Err("'port' takes a name and a byte".to_string()),
        },
        "save" => Command::Save(PathBuf::from(rest()?)),
        "load" => Command::Load(PathBuf::from(rest()?)),
        "reset" if args.is_empty() => Command::Reset,
        "reset" => return Err("'reset' takes no arguments".to_string()),
        _ => return Err(format!("unknown command '{verb}'")),
    };
    Ok(Some(command))
}

/// Parse a whole script. Blank and comment-only lines are skipped.
pub fn parse(text: &str) -> Result<Vec<Command>, ParseError> {
    let mut commands = Vec::new();
    for (index, line) in text.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(command)) => commands.push(command),
            Ok(None) => {}
            Err(message) => {
                return Err(ParseError {
                    line: index + 1,
                    message,
                });
            }
        }
    }
    Ok(commands)
}

fn find_button(machine: &dyn Machine, name: &str) -> Option<u8> {
    let map = machine.input_map();
    map.iter()
        .find(|b| b.name.eq_ignore_ascii_case(name))
        .map(|b| b.id)
        .or_else(|| {
            let id = u8::try_from(parse_number(name)?).ok()?;
            map.iter().any(|b| b.id == id).then_some(id)
        })
}

pub fn describe_event(event: &OutputEvent) -> String {
    let level = |on: bool| if on { "on" } else { "off" };
    match *event {
        OutputEvent::Lamp { index, on } => format!("lamp {index} {}", level(on)),
        OutputEvent::Led { index, on } => format!("led {index} {}", level(on)),
        OutputEvent::CoinCounter { index, on } => format!("coin counter {index} {}", level(on)),
        OutputEvent::Sample { channel, sample } => format!("sample {sample} on channel {channel}"),
        OutputEvent::Volume { channel, level } => format!("volume {channel} = {level:.3}"),
        OutputEvent::SoundGain { chip, level } => format!("sound chip {chip} gain = {level:.3}"),
        OutputEvent::SpeechGain { level } => format!("speech gain = {level:.3}"),
    }
}

fn cpu_label(cpu: BusMaster) -> &'static str {
    match cpu {
        BusMaster::Cpu(0) => "",
        _ => "sub ",
    }
}

/// Execute commands in order, printing read results and output events.
pub fn run(machine: &mut dyn Machine, commands: &[Command], out: &mut dyn Write) -> anyhow::Result<()> {
    for command in commands {
        match command {
            Command::Read { cpu, space, addr } => {
                let value = machine.read_space(*cpu, *space, *addr);
                let verb = if *space == SpaceId::Io { "in" } else { "read" };
                writeln!(out, "{}{verb} {addr:04X} -> {value:02X}", cpu_label(*cpu))?;
            }
            Command::Write {
                cpu,
                space,
                addr,
                data,
            } => machine.write_space(*cpu, *space, *addr, *data),
            Command::Press(name) | Command::Release(name) => {
                let Some(id) = find_button(machine, name) else {
                    bail!("{} has no button '{name}'", machine.name());
                };
                machine.set_input(id, matches!(command, Command::Press(_)));
            }
            Command::Port { name, value } => {
                if !machine.set_port(name, *value) {
                    bail!("{} has no input port '{name}'", machine.name());
                }
            }
            Command::Save(path) => {
                let json = machine.save_state().to_json()?;
                std::fs::write(path, json)
                    .with_context(|| format!("writing save state {}", path.display()))?;
                log::info!("saved state to {}", path.display());
            }
            Command::Load(path) => {
                let json = std::fs::read_to_string(path)
                    .with_context(|| format!("reading save state {}", path.display()))?;
                let state = SaveState::from_json(&json)?;
                machine.load_state(&state)?;
                log::info!("loaded state from {}", path.display());
            }
            Command::Reset => machine.reset(),
        }

        for event in machine.take_output_events() {
            writeln!(out, "  {}", describe_event(&event))?;
        }
    }
    Ok(())
}

/// Print the buttons and named ports a machine exposes.
pub fn describe_machine(machine: &dyn Machine, out: &mut dyn Write) -> std::io::Result<()> {
    writeln!(out, "{}", machine.name())?;
    writeln!(out, "buttons:")?;
    for button in machine.input_map() {
        writeln!(out, "  {:>2}  {}", button.id, button.name)?;
    }
    writeln!(out, "ports:")?;
    for (name, value) in machine.input_ports() {
        writeln!(out, "  {name:<9} {value:02X}")?;
    }
    Ok(())
}
