use astrocade_core::core::address_map::{Access, AddressSpace, ReadAction, WriteAction};
use astrocade_core::core::bus::{Bus, BusMaster};
use astrocade_core::core::input::{InputPorts, PortDef};
use astrocade_core::core::machine::{InputButton, Machine};
use astrocade_core::core::memory::{MemoryRegions, RegionId};
use astrocade_core::core::save_state::{SaveState, StateError};
use astrocade_core::device::{OutputEvent, OutputPanel, ProtectedRam, RegisterLatch};
use bitflags::bitflags;

use crate::astrocade_maps::{self, PortMap, ProgramMap};
use crate::rom_loader::{Checksums, RomLoadError, RomRegion, RomSet};
use crate::{demndrgn, ebases, gorf, profpac, robby, seawolf2, spacezap, tenpindx, wow};

// ---------------------------------------------------------------------------
// Astrocade hardware constants
// ---------------------------------------------------------------------------

/// Screen RAM page size on the 16-colour boards (one CPU window, 4000-7FFF).
pub const SCREEN_PAGE_SIZE: usize = 0x4000;

/// Number of screen RAM pages selectable through the page-select port.
pub const SCREEN_PAGES: usize = 4;

/// Data chip registers that read the four hand-controller ports.
const HANDLE_PORTS: [&str; 4] = ["P1HANDLE", "P2HANDLE", "P3HANDLE", "P4HANDLE"];

/// AY-8912 register whose reads return the I/O port A pins.
const AY_PORT_A: usize = 14;

bitflags! {
    /// Per-game feature flags consumed by the video and sound collaborators.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct VideoConfig: u8 {
        const SOUND_PRESENT = 0x01;
        const LIGHTPEN_INTS = 0x02;
        const STARS = 0x04;
        const MONITOR_BW = 0x08;
    }
}

// ---------------------------------------------------------------------------
// Handler ids
// ---------------------------------------------------------------------------

/// Every read/write handler an Astrocade address space can route to.
///
/// Address spaces store these ids; the board dispatches them against its
/// own state, so handlers never hold references into the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handler {
    // Shared board hardware
    DataChip,
    FuncGen,
    PatternBoard,
    Sound2,
    ProtectedRam,
    ProtectedRamEnable,
    ScreenRam,
    PageSelect,
    Intercept,
    ScreenRamCtrl,
    BankSelect,

    // Per-game I/O
    Seawolf2Sound1,
    Seawolf2Sound2,
    Seawolf2Lamps,
    EbasesCoin,
    EbasesTrackballSelect,
    SpacezapIo,
    WowIo,
    Speech,
    GorfIo1,
    GorfIo2,
    RobbyIo,
    ProfpacIo1,
    ProfpacIo2,
    DemndrgnIo,
    DemndrgnSound,
    TenpinLamp,
    TenpinCounter,
    TenpinLights,
    TenpinSound,

    // Ten Pin Deluxe sound board
    Ctc,
    SoundLatch,
    AyAddress,
    AyRead,
    AyData,
}

/// Input ports whose value is computed from board state instead of sampled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CustomInput {
    EbasesTrackball,
    DemndrgnJoystick,
}

/// Fix-ups run after a save state's raw fields are restored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PostLoadHook {
    RestoreBanking,
}

// ---------------------------------------------------------------------------
// MachineState: per-instance register file
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MachineState {
    /// Last byte written to the first sound-trigger port (rising-edge detect).
    pub port_1_last: u8,
    /// Last byte written to the second sound-trigger port.
    pub port_2_last: u8,
    /// Analog channel multiplexer index.
    pub input_select: u8,
    /// Last byte written to the bank-select port.
    pub profpac_bank: u8,
    pub video_config: VideoConfig,
    pub sparkle: [bool; 4],
}

impl MachineState {
    pub fn new() -> Self {
        Self {
            port_1_last: 0xFF,
            port_2_last: 0xFF,
            input_select: 0,
            profpac_bank: 0,
            video_config: VideoConfig::empty(),
            sparkle: [false; 4],
        }
    }
}

impl Default for MachineState {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Game definitions
// ---------------------------------------------------------------------------

// Button ids shared by every game. Each game maps the subset it has.
pub const INPUT_COIN1: u8 = 0;
pub const INPUT_COIN2: u8 = 1;
pub const INPUT_COIN3: u8 = 2;
pub const INPUT_TILT: u8 = 3;
pub const INPUT_SERVICE: u8 = 4;
pub const INPUT_P1_START: u8 = 5;
pub const INPUT_P2_START: u8 = 6;
pub const INPUT_P1_UP: u8 = 7;
pub const INPUT_P1_DOWN: u8 = 8;
pub const INPUT_P1_LEFT: u8 = 9;
pub const INPUT_P1_RIGHT: u8 = 10;
pub const INPUT_P1_BUTTON1: u8 = 11;
pub const INPUT_P1_BUTTON2: u8 = 12;
pub const INPUT_P1_BUTTON3: u8 = 13;
pub const INPUT_P2_UP: u8 = 14;
pub const INPUT_P2_DOWN: u8 = 15;
pub const INPUT_P2_LEFT: u8 = 16;
pub const INPUT_P2_RIGHT: u8 = 17;
pub const INPUT_P2_BUTTON1: u8 = 18;
pub const INPUT_P2_BUTTON2: u8 = 19;
pub const INPUT_P2_BUTTON3: u8 = 20;

/// A physical button folded into one bit of a named input port.
pub struct ButtonDef {
    pub id: u8,
    pub name: &'static str,
    pub port: &'static str,
    pub mask: u8,
    pub active_low: bool,
}

impl ButtonDef {
    pub const fn low(id: u8, name: &'static str, port: &'static str, mask: u8) -> Self {
        Self {
            id,
            name,
            port,
            mask,
            active_low: true,
        }
    }

    pub const fn high(id: u8, name: &'static str, port: &'static str, mask: u8) -> Self {
        Self {
            id,
            name,
            port,
            mask,
            active_low: false,
        }
    }
}

/// Static description of one game on the Astrocade board.
pub struct GameDef {
    pub name: &'static str,
    pub description: &'static str,
    pub program_map: ProgramMap,
    pub port_map: PortMap,
    pub maincpu: &'static RomRegion,
    /// Primary banked ROM (16-colour boards).
    pub user1: Option<&'static RomRegion>,
    /// Optional expansion ROM board.
    pub user2: Option<&'static RomRegion>,
    /// Sound CPU program (Ten Pin Deluxe).
    pub sub: Option<&'static RomRegion>,
    pub ports: &'static [PortDef],
    pub custom_inputs: &'static [(&'static str, CustomInput)],
    pub buttons: &'static [ButtonDef],
    /// Installs the game's I/O handlers and picks its video flags.
    pub init: fn(&mut AstrocadeBoard),
    /// Called after a named port is overwritten by the host.
    pub port_changed: Option<fn(&mut AstrocadeBoard, &str, u8)>,
}

/// Assembled ROM regions for one game.
pub struct RomImages {
    pub maincpu: Vec<u8>,
    pub user1: Option<Vec<u8>>,
    pub user2: Option<Vec<u8>>,
    pub sub: Option<Vec<u8>>,
}

impl RomImages {
    pub fn load(def: &GameDef, rom_set: &RomSet, checksums: Checksums) -> Result<Self, RomLoadError> {
        let load = |region: &RomRegion| region.load_with(rom_set, checksums);
        Ok(Self {
            maincpu: load(def.maincpu)?,
            user1: def.user1.map(load).transpose()?,
            user2: def.user2.map(load).transpose()?,
            sub: def.sub.map(load).transpose()?,
        })
    }

    /// Regions with no ROMs loaded, every byte at the region's fill value.
    pub fn blank(def: &GameDef) -> Self {
        let blank = |region: &RomRegion| vec![region.fill; region.size];
        Self {
            maincpu: blank(def.maincpu),
            user1: def.user1.map(blank),
            user2: def.user2.map(blank),
            sub: def.sub.map(blank),
        }
    }
}

// ---------------------------------------------------------------------------
// AstrocadeBoard
// ---------------------------------------------------------------------------

/// Bally/Midway Astrocade arcade board.
///
/// Holds the main Z80's program and I/O address spaces, the optional sound
/// CPU's spaces (Ten Pin Deluxe), every byte region, and the register file
/// the game handlers mutate. The custom video/sound chips are opaque
/// register latches; only the routing and banking around them is modeled.
pub struct AstrocadeBoard {
    pub(crate) name: &'static str,
    pub(crate) state: MachineState,
    pub(crate) memory: MemoryRegions,

    pub(crate) program: AddressSpace<Handler>,
    pub(crate) io: AddressSpace<Handler>,
    pub(crate) sub_program: AddressSpace<Handler>,
    pub(crate) sub_io: AddressSpace<Handler>,

    pub(crate) inputs: InputPorts,
    custom_inputs: &'static [(&'static str, CustomInput)],
    pub(crate) outputs: OutputPanel,

    pub(crate) protected_ram: Option<ProtectedRam>,
    /// RAM regions captured in save states, by save-state field name.
    pub(crate) ram_regions: Vec<(&'static str, RegionId)>,
    pub(crate) nvram: Option<RegionId>,
    pub(crate) screen_ram: Option<RegionId>,

    pub(crate) data_chip: RegisterLatch,
    pub(crate) sound2: RegisterLatch,
    pub(crate) pattern_board: RegisterLatch,
    pub(crate) screen_ctrl: RegisterLatch,
    pub(crate) screen_page: u8,
    pub(crate) speech: RegisterLatch,

    pub(crate) ctc: RegisterLatch,
    pub(crate) ay: RegisterLatch,
    pub(crate) ay_address: u8,
    pub(crate) sound_latch: u8,
    pub(crate) sub_nmi_pending: bool,

    pub(crate) post_load: Vec<PostLoadHook>,
}

impl AstrocadeBoard {
    /// Build the board for `def`: regions, static maps, driver init, then
    /// machine start.
    pub fn new(def: &GameDef, images: RomImages) -> Self {
        let mut memory = MemoryRegions::new();
        memory.add_region("maincpu", images.maincpu);
        if let Some(user1) = images.user1 {
            memory.add_region("user1", user1);
        }
        if let Some(user2) = images.user2 {
            memory.add_region("user2", user2);
        }
        if let Some(sub) = images.sub {
            memory.add_region("sub", sub);
        }

        let mut board = Self {
            name: def.name,
            state: MachineState::new(),
            memory,
            program: AddressSpace::new("program"),
            io: AddressSpace::new("io"),
            sub_program: AddressSpace::new("sub program"),
            sub_io: AddressSpace::new("sub io").with_global_mask(0x00FF),
            inputs: InputPorts::new(def.ports),
            custom_inputs: def.custom_inputs,
            outputs: OutputPanel::new(),
            protected_ram: None,
            ram_regions: Vec::new(),
            nvram: None,
            screen_ram: None,
            data_chip: RegisterLatch::new("astrocade_data_chip", 0x20),
            sound2: RegisterLatch::new("astrocade2", 0x10),
            pattern_board: RegisterLatch::new("pattern_board", 0x08),
            screen_ctrl: RegisterLatch::new("profpac_screenram_ctrl", 0x08),
            screen_page: 0,
            speech: RegisterLatch::new("speech", 1),
            ctc: RegisterLatch::new("ctc", 4),
            ay: RegisterLatch::new("ay8912", 16),
            ay_address: 0,
            sound_latch: 0,
            sub_nmi_pending: false,
            post_load: Vec::new(),
        };

        astrocade_maps::install_program_map(&mut board, def.program_map);
        astrocade_maps::install_port_map(&mut board, def.port_map);
        if def.sub.is_some() {
            astrocade_maps::install_tenpin_sub_maps(&mut board);
        }

        (def.init)(&mut board);
        board.machine_start();
        board
    }

    fn machine_start(&mut self) {
        self.state.port_1_last = 0xFF;
        self.state.port_2_last = 0xFF;
    }

    /// Allocate a zeroed RAM region and register it for save states.
    pub(crate) fn add_ram(&mut self, name: &'static str, size: usize) -> RegionId {
        let id = self.memory.add_filled(name, size, 0);
        self.ram_regions.push((name, id));
        id
    }

    /// Register a post-load fix-up. Registering the same hook twice is a no-op.
    pub(crate) fn register_post_load(&mut self, hook: PostLoadHook) {
        if !self.post_load.contains(&hook) {
            self.post_load.push(hook);
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn state(&self) -> &MachineState {
        &self.state
    }

    pub fn video_config(&self) -> VideoConfig {
        self.state.video_config
    }

    pub fn sparkle(&self) -> [bool; 4] {
        self.state.sparkle
    }

    pub fn outputs(&self) -> &OutputPanel {
        &self.outputs
    }

    pub fn memory(&self) -> &MemoryRegions {
        &self.memory
    }

    pub fn program_space(&self) -> &AddressSpace<Handler> {
        &self.program
    }

    pub fn io_space(&self) -> &AddressSpace<Handler> {
        &self.io
    }

    pub fn protected_ram(&self) -> Option<&ProtectedRam> {
        self.protected_ram.as_ref()
    }

    pub fn sound_latch(&self) -> u8 {
        self.sound_latch
    }

    /// Consume a pending NMI pulse for the sound CPU.
    pub fn take_sub_nmi(&mut self) -> bool {
        std::mem::take(&mut self.sub_nmi_pending)
    }

    // -----------------------------------------------------------------------
    // Inputs
    // -----------------------------------------------------------------------

    /// Read a named input port, going through custom-input hooks first.
    pub fn read_port(&self, name: &str) -> u8 {
        match self.custom_inputs.iter().find(|(n, _)| *n == name) {
            Some((_, CustomInput::EbasesTrackball)) => ebases::trackball_r(self),
            Some((_, CustomInput::DemndrgnJoystick)) => demndrgn::joystick_r(self),
            None => self.inputs.read(name),
        }
    }

    // -----------------------------------------------------------------------
    // Access routing
    // -----------------------------------------------------------------------

    pub fn program_read(&mut self, addr: u16) -> u8 {
        let action = self.program.read(addr, &self.memory);
        self.complete_read(action)
    }

    pub fn program_write(&mut self, addr: u16, data: u8) {
        let action = self.program.write(addr, data, &mut self.memory);
        self.complete_write(action, data);
    }

    pub fn io_read(&mut self, addr: u16) -> u8 {
        let action = self.io.read(addr, &self.memory);
        self.complete_read(action)
    }

    pub fn io_write(&mut self, addr: u16, data: u8) {
        let action = self.io.write(addr, data, &mut self.memory);
        self.complete_write(action, data);
    }

    pub fn sub_program_read(&mut self, addr: u16) -> u8 {
        let action = self.sub_program.read(addr, &self.memory);
        self.complete_read(action)
    }

    pub fn sub_program_write(&mut self, addr: u16, data: u8) {
        let action = self.sub_program.write(addr, data, &mut self.memory);
        self.complete_write(action, data);
    }

    pub fn sub_io_read(&mut self, addr: u16) -> u8 {
        let action = self.sub_io.read(addr, &self.memory);
        self.complete_read(action)
    }

    pub fn sub_io_write(&mut self, addr: u16, data: u8) {
        let action = self.sub_io.write(addr, data, &mut self.memory);
        self.complete_write(action, data);
    }

    fn complete_read(&mut self, action: ReadAction<Handler>) -> u8 {
        match action {
            ReadAction::Value(v) => v,
            ReadAction::Port(name) => self.read_port(name),
            ReadAction::Handler(handler, access) => self.handler_read(handler, access),
        }
    }

    fn complete_write(&mut self, action: WriteAction<Handler>, data: u8) {
        if let WriteAction::Handler(handler, access) = action {
            self.handler_write(handler, access, data);
        }
    }

    fn handler_read(&mut self, handler: Handler, access: Access) -> u8 {
        match handler {
            Handler::DataChip => self.data_chip_r(access),
            Handler::ProtectedRam => self.protected_ram_r(access),
            Handler::ScreenRam => self.screen_ram_r(access),
            Handler::Intercept => self.screen_ctrl.read(3),
            Handler::SpacezapIo => spacezap::io_r(self, access),
            Handler::WowIo => wow::io_r(self, access),
            Handler::Speech => wow::speech_r(self, access),
            Handler::GorfIo1 => gorf::io_1_r(self, access),
            Handler::GorfIo2 => gorf::io_2_r(self, access),
            Handler::RobbyIo => robby::io_r(self, access),
            Handler::ProfpacIo1 => profpac::io_1_r(self, access),
            Handler::ProfpacIo2 => profpac::io_2_r(self, access),
            Handler::DemndrgnIo => demndrgn::io_r(self, access),
            Handler::Ctc => self.ctc.read(access.offset as usize),
            Handler::SoundLatch => self.sound_latch,
            Handler::AyRead => self.ay_r(),
            _ => {
                log::trace!("{handler:?}: read at {:04X} ignored", access.addr);
                0xFF
            }
        }
    }

    fn handler_write(&mut self, handler: Handler, access: Access, data: u8) {
        match handler {
            Handler::DataChip => self.data_chip.write((access.offset & 0xFF) as usize, data),
            Handler::FuncGen => self.funcgen_w(access, data),
            Handler::PatternBoard => self.pattern_board.write(access.offset as usize, data),
            Handler::Sound2 => self.sound2.write((access.offset & 0x0F) as usize, data),
            Handler::ProtectedRam => self.protected_ram_w(access, data),
            Handler::ProtectedRamEnable => self.protected_ram_enable_w(),
            Handler::ScreenRam => self.screen_ram_w(access, data),
            Handler::PageSelect => self.screen_page = data,
            Handler::ScreenRamCtrl => self.screen_ctrl.write(access.offset as usize, data),
            Handler::BankSelect => self.profpac_banksw_w(data),
            Handler::Seawolf2Sound1 => seawolf2::sound_1_w(self, data),
            Handler::Seawolf2Sound2 => seawolf2::sound_2_w(self, data),
            Handler::Seawolf2Lamps => seawolf2::lamps_w(self, access, data),
            Handler::EbasesCoin => ebases::coin_w(self, data),
            Handler::EbasesTrackballSelect => ebases::trackball_select_w(self, data),
            Handler::DemndrgnSound => demndrgn::sound_w(self, data),
            Handler::TenpinLamp => tenpindx::lamp_w(self, access, data),
            Handler::TenpinCounter => tenpindx::counter_w(self, data),
            Handler::TenpinLights => tenpindx::lights_w(self, data),
            Handler::TenpinSound => tenpindx::sound_w(self, data),
            Handler::Ctc => self.ctc.write(access.offset as usize, data),
            Handler::AyAddress => self.ay_address = data & 0x0F,
            Handler::AyData => self.ay.write(self.ay_address as usize, data),
            _ => log::trace!("{handler:?}: write {data:02X} at {:04X} ignored", access.addr),
        }
    }

    // -----------------------------------------------------------------------
    // Shared handlers
    // -----------------------------------------------------------------------

    fn data_chip_r(&mut self, access: Access) -> u8 {
        let reg = (access.offset & 0xFF) as usize;
        match reg {
            0x10..=0x13 => self.read_port(HANDLE_PORTS[reg - 0x10]),
            _ => self.data_chip.read(reg),
        }
    }

    /// Function generator writes land in video memory one window up.
    fn funcgen_w(&mut self, access: Access, data: u8) {
        self.program_write(0x4000 | (access.offset & 0x3FFF), data);
    }

    fn protected_ram_enable_w(&mut self) {
        if let Some(ram) = self.protected_ram.as_mut() {
            ram.arm();
        }
    }

    fn protected_ram_r(&mut self, access: Access) -> u8 {
        match self.protected_ram.as_mut() {
            Some(ram) => ram.read(access.offset),
            None => 0xFF,
        }
    }

    fn protected_ram_w(&mut self, access: Access, data: u8) {
        if let Some(ram) = self.protected_ram.as_mut() {
            ram.write(access.offset, data);
        }
    }

    /// Screen RAM read through the current read page (page-select bits 0-1).
    fn screen_ram_r(&mut self, access: Access) -> u8 {
        let Some(id) = self.screen_ram else {
            return 0xFF;
        };
        let page = (self.screen_page & 0x03) as usize;
        self.memory
            .read(id, page * SCREEN_PAGE_SIZE + access.offset as usize)
            .unwrap_or(0xFF)
    }

    /// Screen RAM write through the current write page (page-select bits 2-3).
    fn screen_ram_w(&mut self, access: Access, data: u8) {
        let Some(id) = self.screen_ram else {
            return;
        };
        let page = ((self.screen_page >> 2) & 0x03) as usize;
        self.memory
            .write(id, page * SCREEN_PAGE_SIZE + access.offset as usize, data);
    }

    fn ay_r(&self) -> u8 {
        match self.ay_address as usize {
            AY_PORT_A => self.read_port("DIPSW"),
            reg => self.ay.read(reg),
        }
    }

    // -----------------------------------------------------------------------
    // Reset / NVRAM / save states
    // -----------------------------------------------------------------------

    /// Reset the custom chips and latches. RAM, NVRAM and the bank selector
    /// keep their contents.
    pub fn reset(&mut self) {
        self.data_chip.reset();
        self.sound2.reset();
        self.pattern_board.reset();
        self.screen_ctrl.reset();
        self.speech.reset();
        self.ctc.reset();
        self.ay.reset();
        self.ay_address = 0;
        self.sound_latch = 0;
        self.sub_nmi_pending = false;
        if let Some(ram) = self.protected_ram.as_mut() {
            ram.set_armed(false);
        }
    }

    /// Battery-backed block E000-E7FF. The protected RAM carved out of its
    /// start supplies the leading bytes.
    pub fn save_nvram(&self) -> Option<Vec<u8>> {
        let id = self.nvram?;
        let mut image = self.memory.region(id).to_vec();
        if let Some(ram) = &self.protected_ram {
            let len = ram.len().min(image.len());
            image[..len].copy_from_slice(&ram.snapshot()[..len]);
        }
        Some(image)
    }

    pub fn load_nvram(&mut self, data: &[u8]) {
        let Some(id) = self.nvram else {
            return;
        };
        let region = self.memory.region_mut(id);
        let len = data.len().min(region.len());
        region[..len].copy_from_slice(&data[..len]);
        if let Some(ram) = self.protected_ram.as_mut() {
            ram.load_from(data);
        }
    }

    pub fn save_state(&self) -> SaveState {
        let mut state = SaveState::new(self.name);
        state.put_u8("port_1_last", self.state.port_1_last);
        state.put_u8("port_2_last", self.state.port_2_last);
        state.put_bool(
            "ram_write_enable",
            self.protected_ram.as_ref().is_some_and(ProtectedRam::is_armed),
        );
        state.put_u8("input_select", self.state.input_select);
        state.put_u8("profpac_bank", self.state.profpac_bank);
        state.put_bytes("sparkle", &self.state.sparkle.map(u8::from));

        if let Some(ram) = &self.protected_ram {
            state.put_bytes("protected_ram", ram.snapshot());
        }
        for (name, id) in &self.ram_regions {
            state.put_bytes(name, self.memory.region(*id));
        }

        state.put_bytes("data_chip", self.data_chip.snapshot());
        state.put_bytes("astrocade2", self.sound2.snapshot());
        state.put_bytes("pattern_board", self.pattern_board.snapshot());
        state.put_bytes("screenram_ctrl", self.screen_ctrl.snapshot());
        state.put_u8("screen_page", self.screen_page);
        state.put_bytes("ctc", self.ctc.snapshot());
        state.put_bytes("ay8912", self.ay.snapshot());
        state.put_u8("ay_address", self.ay_address);
        state.put_u8("sound_latch", self.sound_latch);
        state
    }

    /// Two-phase restore: copy every raw field, then run the registered
    /// post-load hooks so derived mappings follow the restored registers.
    pub fn load_state(&mut self, state: &SaveState) -> Result<(), StateError> {
        state.expect_machine(self.name)?;

        // Validate everything before touching the board.
        let port_1_last = state.get_u8("port_1_last")?;
        let port_2_last = state.get_u8("port_2_last")?;
        let ram_write_enable = state.get_bool("ram_write_enable")?;
        let input_select = state.get_u8("input_select")?;
        let profpac_bank = state.get_u8("profpac_bank")?;
        let mut sparkle = [0u8; 4];
        state.copy_bytes("sparkle", &mut sparkle)?;

        let mut protected = self.protected_ram.as_ref().map(|r| vec![0u8; r.len()]);
        if let Some(buf) = protected.as_mut() {
            state.copy_bytes("protected_ram", buf)?;
        }
        let mut regions = Vec::with_capacity(self.ram_regions.len());
        for (name, id) in &self.ram_regions {
            let mut buf = vec![0u8; self.memory.region(*id).len()];
            state.copy_bytes(name, &mut buf)?;
            regions.push((*id, buf));
        }
        let mut chips = Vec::new();
        for (name, len) in [
            ("data_chip", self.data_chip.snapshot().len()),
            ("astrocade2", self.sound2.snapshot().len()),
            ("pattern_board", self.pattern_board.snapshot().len()),
            ("screenram_ctrl", self.screen_ctrl.snapshot().len()),
            ("ctc", self.ctc.snapshot().len()),
            ("ay8912", self.ay.snapshot().len()),
        ] {
            let mut buf = vec![0u8; len];
            state.copy_bytes(name, &mut buf)?;
            chips.push(buf);
        }
        let screen_page = state.get_u8("screen_page")?;
        let ay_address = state.get_u8("ay_address")?;
        let sound_latch = state.get_u8("sound_latch")?;

        // Phase 1: raw fields.
        self.state.port_1_last = port_1_last;
        self.state.port_2_last = port_2_last;
        self.state.input_select = input_select;
        self.state.profpac_bank = profpac_bank;
        self.state.sparkle = sparkle.map(|b| b != 0);
        if let (Some(ram), Some(buf)) = (self.protected_ram.as_mut(), protected) {
            ram.load_from(&buf);
            ram.set_armed(ram_write_enable);
        }
        for (id, buf) in regions {
            self.memory.region_mut(id).copy_from_slice(&buf);
        }
        let latches = [
            &mut self.data_chip,
            &mut self.sound2,
            &mut self.pattern_board,
            &mut self.screen_ctrl,
            &mut self.ctc,
            &mut self.ay,
        ];
        for (latch, buf) in latches.into_iter().zip(chips) {
            latch.load_from(&buf);
        }
        self.screen_page = screen_page;
        self.ay_address = ay_address;
        self.sound_latch = sound_latch;

        // Phase 2: post-load fix-ups.
        for hook in self.post_load.clone() {
            match hook {
                PostLoadHook::RestoreBanking => self.profpac_banksw_w(self.state.profpac_bank),
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Bus implementation. Main CPU is Cpu(0), Ten Pin sound CPU is Cpu(1).
// ---------------------------------------------------------------------------

impl Bus for AstrocadeBoard {
    type Address = u16;
    type Data = u8;

    fn read(&mut self, master: BusMaster, addr: u16) -> u8 {
        match master {
            BusMaster::Cpu(0) => self.program_read(addr),
            BusMaster::Cpu(1) => self.sub_program_read(addr),
            BusMaster::Cpu(_) => 0xFF,
        }
    }

    fn write(&mut self, master: BusMaster, addr: u16, data: u8) {
        match master {
            BusMaster::Cpu(0) => self.program_write(addr, data),
            BusMaster::Cpu(1) => self.sub_program_write(addr, data),
            BusMaster::Cpu(_) => {}
        }
    }

    fn io_read(&mut self, master: BusMaster, addr: u16) -> u8 {
        match master {
            BusMaster::Cpu(0) => AstrocadeBoard::io_read(self, addr),
            BusMaster::Cpu(1) => self.sub_io_read(addr),
            BusMaster::Cpu(_) => 0xFF,
        }
    }

    fn io_write(&mut self, master: BusMaster, addr: u16, data: u8) {
        match master {
            BusMaster::Cpu(0) => AstrocadeBoard::io_write(self, addr, data),
            BusMaster::Cpu(1) => self.sub_io_write(addr, data),
            BusMaster::Cpu(_) => {}
        }
    }
}

// ---------------------------------------------------------------------------
// AstrocadeSystem: one game running on the board
// ---------------------------------------------------------------------------

pub struct AstrocadeSystem {
    pub(crate) board: AstrocadeBoard,
    def: &'static GameDef,
    input_map: Vec<InputButton>,
}

impl AstrocadeSystem {
    /// Build the game with blank ROM regions (for tests and tools).
    pub fn new(def: &'static GameDef) -> Self {
        Self::with_images(def, RomImages::blank(def))
    }

    pub fn with_images(def: &'static GameDef, images: RomImages) -> Self {
        let input_map = def
            .buttons
            .iter()
            .map(|b| InputButton {
                id: b.id,
                name: b.name,
            })
            .collect();
        Self {
            board: AstrocadeBoard::new(def, images),
            def,
            input_map,
        }
    }

    pub fn from_rom_set(
        def: &'static GameDef,
        rom_set: &RomSet,
        checksums: Checksums,
    ) -> Result<Self, RomLoadError> {
        Ok(Self::with_images(def, RomImages::load(def, rom_set, checksums)?))
    }

    pub fn def(&self) -> &'static GameDef {
        self.def
    }

    pub fn board(&self) -> &AstrocadeBoard {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut AstrocadeBoard {
        &mut self.board
    }
}

impl Bus for AstrocadeSystem {
    type Address = u16;
    type Data = u8;

    fn read(&mut self, master: BusMaster, addr: u16) -> u8 {
        self.board.read(master, addr)
    }

    fn write(&mut self, master: BusMaster, addr: u16, data: u8) {
        self.board.write(master, addr, data);
    }

    fn io_read(&mut self, master: BusMaster, addr: u16) -> u8 {
        Bus::io_read(&mut self.board, master, addr)
    }

    fn io_write(&mut self, master: BusMaster, addr: u16, data: u8) {
        Bus::io_write(&mut self.board, master, addr, data);
    }
}

impl Machine for AstrocadeSystem {
    fn name(&self) -> &'static str {
        self.def.name
    }

    fn set_input(&mut self, button: u8, pressed: bool) {
        let Some(def) = self.def.buttons.iter().find(|b| b.id == button) else {
            return;
        };
        if def.active_low {
            self.board
                .inputs
                .set_bit_active_low(def.port, def.mask, pressed);
        } else {
            self.board.inputs.set_bit(def.port, def.mask, pressed);
        }
    }

    fn input_map(&self) -> &[InputButton] {
        &self.input_map
    }

    fn set_port(&mut self, name: &str, value: u8) -> bool {
        if !self.board.inputs.set(name, value) {
            return false;
        }
        if let Some(hook) = self.def.port_changed {
            hook(&mut self.board, name, value);
        }
        true
    }

    fn input_ports(&self) -> Vec<(&'static str, u8)> {
        self.def
            .ports
            .iter()
            .map(|p| (p.name, self.board.read_port(p.name)))
            .collect()
    }

    fn reset(&mut self) {
        self.board.reset();
    }

    fn save_nvram(&self) -> Option<Vec<u8>> {
        self.board.save_nvram()
    }

    fn load_nvram(&mut self, data: &[u8]) {
        self.board.load_nvram(data);
    }

    fn save_state(&self) -> SaveState {
        self.board.save_state()
    }

    fn load_state(&mut self, state: &SaveState) -> Result<(), StateError> {
        self.board.load_state(state)
    }

    fn take_output_events(&mut self) -> Vec<OutputEvent> {
        self.board.outputs.take_events()
    }
}
