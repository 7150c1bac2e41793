
use std::collections::VecDeque;
use std::io::{self, IsTerminal, Read, Write, stdout};
use std::sync::Mutex;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use crate::Interrupt;
use crate::io::lock;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use derive_more::IsVariant;
use log::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum Input {
    Char(u8),
    Eof,
}

impl Input {
    // What a program sees when it reads past the end of input: C's EOF, truncated to a word.
    pub const EOF_WORD: u16 = 0xFFFF;

    pub fn to_word(self) -> u16 {
        match self {
            Input::Char(ch) => ch as u16,
            Input::Eof => Self::EOF_WORD,
        }
    }
}

/// The host's character terminal, as seen by the trap routines and the keyboard registers.
pub trait Console: Send + Sync {
    /// Writes and flushes.
    fn write(&self, bytes: &[u8]);

    // Never blocks. None means nothing has been typed yet.
    fn poll_input(&self) -> Option<Input>;

    fn read_input(&self) -> Input;
}

////////////////////////////////////////////////////////////////////////////////

// Stdin is drained by a reader thread into a channel, so the keyboard
// registers can be polled without blocking. When the channel disconnects the
// input is at end of stream.
pub struct StdConsole {
    input: Mutex<Receiver<u8>>,
    raw: bool,
    interrupt: Interrupt,
}

impl StdConsole {
    // How often a blocked read checks for an interrupt.
    const INTERRUPT_POLL: Duration = Duration::from_millis(50);
}

impl StdConsole {
    /// Starts reading stdin. With `raw` set and a terminal on stdin, the
    /// terminal is put in raw mode (no echo, no line buffering) until the
    /// console is dropped, and Ctrl-C triggers `interrupt`.
    pub fn new(interrupt: Interrupt, raw: bool) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        let raw = raw && io::stdin().is_terminal();
        if raw {
            terminal::enable_raw_mode()?;
            let interrupt = interrupt.clone();
            thread::spawn(move || read_key_events(tx, interrupt));
        } else {
            thread::spawn(move || read_bytes(tx));
        }
        Ok(StdConsole { input: Mutex::new(rx), raw, interrupt })
    }
}

impl Drop for StdConsole {
    fn drop(&mut self) {
        if self.raw {
            if let Err(e) = terminal::disable_raw_mode() {
                error!("Console: couldn't leave raw mode: {e}");
            }
        }
    }
}

impl Console for StdConsole {
    fn write(&self, bytes: &[u8]) {
        let mut out = stdout().lock();
        let res = if self.raw {
            write_raw(&mut out, bytes)
        } else {
            out.write_all(bytes)
        };
        if let Err(e) = res.and_then(|()| out.flush()) {
            error!("Console: write failed: {e}");
        }
    }

    fn poll_input(&self) -> Option<Input> {
        match lock(&self.input).try_recv() {
            Ok(ch) => Some(Input::Char(ch)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Input::Eof),
        }
    }

    // An interrupt ends the wait as if input had closed, so the trap in
    // flight can finish.
    fn read_input(&self) -> Input {
        let input = lock(&self.input);
        loop {
            match input.recv_timeout(Self::INTERRUPT_POLL) {
                Ok(ch) => return Input::Char(ch),
                Err(RecvTimeoutError::Disconnected) => return Input::Eof,
                Err(RecvTimeoutError::Timeout) => {
                    if self.interrupt.is_triggered() {
                        debug!("Console: read cut short by interrupt");
                        return Input::Eof;
                    }
                }
            }
        }
    }
}

// Raw mode turns off output post-processing, so newlines need their carriage return back.
fn write_raw(out: &mut impl Write, bytes: &[u8]) -> io::Result<()> {
    for (i, line) in bytes.split(|b| *b == b'\n').enumerate() {
        if i > 0 {
            out.write_all(b"\r\n")?;
        }
        out.write_all(line)?;
    }
    Ok(())
}

fn read_bytes(tx: Sender<u8>) {
    for byte in io::stdin().lock().bytes() {
        match byte {
            Ok(ch) => {
                if tx.send(ch).is_err() {
                    return;
                }
            }
            Err(e) => {
                error!("Console: reading stdin failed: {e}");
                return;
            }
        }
    }
    debug!("Console: end of input");
}

fn read_key_events(tx: Sender<u8>, interrupt: Interrupt) {
    loop {
        let key = match event::read() {
            Ok(Event::Key(key)) => key,
            Ok(_) => continue,
            Err(e) => {
                error!("Console: reading terminal events failed: {e}");
                return;
            }
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            // Raw mode swallows SIGINT, so this is the interrupt. Hanging up
            // the channel also releases a GETC blocked on input.
            debug!("Console: interrupt");
            interrupt.trigger();
            return;
        }

        let mut buf = [0u8; 4];
        let bytes: &[u8] = match key.code {
            KeyCode::Char(c) if ctrl && c.is_ascii_alphabetic() => {
                buf[0] = (c.to_ascii_lowercase() as u8) & 0x1f;
                &buf[..1]
            }
            KeyCode::Char(c) => c.encode_utf8(&mut buf).as_bytes(),
            KeyCode::Enter => b"\n",
            KeyCode::Tab => b"\t",
            KeyCode::Backspace => b"\x7f",
            KeyCode::Esc => b"\x1b",
            _ => continue,
        };
        for ch in bytes {
            if tx.send(*ch).is_err() {
                return;
            }
        }
    }
}

////////////////////////////////////////////////////////////////////////////////

/// In-memory console. Input is queued up front; output is collected for inspection.
/// Reading from an empty queue is end of input.
#[derive(Default)]
pub struct PipeConsole {
    out_buf: Mutex<VecDeque<u8>>,
    in_buf: Mutex<VecDeque<u8>>,
}

impl PipeConsole {
    pub fn take_output(&self) -> Vec<u8> {
        std::mem::take(&mut *lock(&self.out_buf)).into()
    }

    pub fn take_output_string(&self) -> String {
        String::from_utf8_lossy(&self.take_output()).into_owned()
    }

    pub fn push_input(&self, val: u8) {
        lock(&self.in_buf).push_back(val);
    }

    pub fn write_input(&self, vals: &[u8]) {
        for val in vals.iter() {
            self.push_input(*val);
        }
    }
}

impl Console for PipeConsole {
    fn write(&self, bytes: &[u8]) {
        lock(&self.out_buf).extend(bytes);
    }

    fn poll_input(&self) -> Option<Input> {
        lock(&self.in_buf).pop_front().map(Input::Char)
    }

    fn read_input(&self) -> Input {
        lock(&self.in_buf).pop_front().map_or(Input::Eof, Input::Char)
    }
}
