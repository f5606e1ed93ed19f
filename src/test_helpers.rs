extern crate std;

use std::boxed::Box;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::string::{String, ToString};
use std::vec::Vec;

use atat::{asynch::AtatClient, AtDigester, AtatCmd, AtatIngress, ResponseSlot};
use embassy_time::{Duration, Timer};

use crate::asynch::channel::AtatChannel;
use crate::asynch::urc::{Ingress, UrcChannel};
use crate::error::Error;
use crate::modules::{GenericModem, ModeCombination, SupportedModes};

const INGRESS_BUF_SIZE: usize = 256;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A URC channel that lives for the rest of the test binary.
pub fn leak_urc_channel() -> &'static UrcChannel {
    Box::leak(Box::new(UrcChannel::new()))
}

/// Text of `cmd` as written to the port, without the `AT` prefix and the
/// line terminator.
pub fn command_text<Cmd: AtatCmd>(cmd: &Cmd) -> String {
    let mut buf = std::vec![0; Cmd::MAX_LEN];
    let len = cmd.write(&mut buf);
    let text = std::str::from_utf8(&buf[..len]).unwrap();
    let text = text.strip_prefix("AT").unwrap_or(text);
    text.trim_end_matches(['\r', '\n']).to_string()
}

struct Expectation {
    command: String,
    reply: Result<String, atat::Error>,
    urcs: Vec<String>,
    delay: Option<Duration>,
    hook: Option<Box<dyn FnOnce()>>,
}

#[derive(Default)]
struct Inner {
    script: VecDeque<Expectation>,
    sent: Vec<String>,
    ingress: Option<Ingress<'static, INGRESS_BUF_SIZE>>,
}

/// Atat client replaying a fixed script.
///
/// Each command must match the next expectation exactly, otherwise the
/// test panics. Unsolicited lines attached to an expectation go through
/// the port ingress before its reply is returned.
#[derive(Clone, Default)]
pub struct ScriptedChannel {
    inner: Rc<RefCell<Inner>>,
}

impl ScriptedChannel {
    pub fn new() -> Self {
        init_logging();
        Self::default()
    }

    pub fn with_urc_channel(urc_channel: &'static UrcChannel) -> Self {
        let buf = Box::leak(Box::new([0; INGRESS_BUF_SIZE]));
        let slot = Box::leak(Box::new(ResponseSlot::<INGRESS_BUF_SIZE>::new()));
        let mock = Self::new();
        mock.inner.borrow_mut().ingress = Some(atat::Ingress::new(
            AtDigester::new(),
            buf,
            slot,
            urc_channel,
        ));
        mock
    }

    /// The client wrapped the way the plugins consume it.
    pub fn channel(&self) -> AtatChannel<ScriptedChannel> {
        AtatChannel::new(self.clone())
    }

    /// Push `urc` through the ingress as if the modem sent it.
    pub fn emit(&self, urc: &str) {
        let mut inner = self.inner.borrow_mut();
        let ingress = inner
            .ingress
            .as_mut()
            .expect("channel built without a URC channel");
        let line = std::format!("\r\n{}\r\n", urc);
        let buf = ingress.write_buf();
        buf[..line.len()].copy_from_slice(line.as_bytes());
        ingress.try_advance(line.len()).unwrap();
    }

    fn push(
        &self,
        command: &str,
        reply: Result<&str, atat::Error>,
        urcs: &[&str],
        delay: Option<Duration>,
    ) {
        self.inner.borrow_mut().script.push_back(Expectation {
            command: command.to_string(),
            reply: reply.map(|r| r.to_string()),
            urcs: urcs.iter().map(|u| u.to_string()).collect(),
            delay,
            hook: None,
        });
    }

    pub fn expect(&self, command: &str, reply: Result<&str, atat::Error>) {
        self.push(command, reply, &[], None);
    }

    /// Emit `urc` before replying to `command`.
    pub fn expect_with_urc(&self, command: &str, reply: Result<&str, atat::Error>, urc: &str) {
        self.push(command, reply, &[urc], None);
    }

    /// Emit `urc` right away, and reply to `command` after `delay`.
    pub fn expect_delayed_with_urc(
        &self,
        command: &str,
        reply: Result<&str, atat::Error>,
        delay: Duration,
        urc: &str,
    ) {
        self.push(command, reply, &[urc], Some(delay));
    }

    /// Reply to `command` only after `delay`.
    pub fn expect_delayed(&self, command: &str, reply: Result<&str, atat::Error>, delay: Duration) {
        self.push(command, reply, &[], Some(delay));
    }

    /// Run `hook` when `command` is received, before replying.
    pub fn expect_with_hook(
        &self,
        command: &str,
        reply: Result<&str, atat::Error>,
        hook: impl FnOnce() + 'static,
    ) {
        self.push(command, reply, &[], None);
        if let Some(last) = self.inner.borrow_mut().script.back_mut() {
            last.hook = Some(Box::new(hook));
        }
    }

    /// Record an out-of-band event in the sent log, to check ordering
    /// against commands.
    pub fn note(&self, event: &str) {
        self.inner.borrow_mut().sent.push(event.to_string());
    }

    pub fn sent(&self) -> Vec<String> {
        self.inner.borrow().sent.clone()
    }

    pub fn is_done(&self) -> bool {
        self.inner.borrow().script.is_empty()
    }
}

impl AtatClient for ScriptedChannel {
    async fn send<Cmd: AtatCmd>(&mut self, cmd: &Cmd) -> Result<Cmd::Response, atat::Error> {
        let command = command_text(cmd);
        let expectation = {
            let mut inner = self.inner.borrow_mut();
            inner.sent.push(command.clone());
            match inner.script.pop_front() {
                Some(e) if e.command == command => e,
                Some(e) => panic!("expected command {:?}, got {:?}", e.command, command),
                None => panic!("unexpected command {:?}", command),
            }
        };

        if let Some(hook) = expectation.hook {
            hook();
        }

        for urc in &expectation.urcs {
            self.emit(urc);
        }

        if let Some(delay) = expectation.delay {
            Timer::after(delay).await;
        }

        match expectation.reply {
            Ok(reply) => cmd.parse(Ok(reply.as_bytes())),
            Err(e) => Err(e),
        }
    }
}

/// Generic modem double. Every call chained up to it is noted on the
/// channel log as `parent:<operation>`.
pub struct FakeModem {
    log: ScriptedChannel,
    pub supported_modes: Vec<ModeCombination>,
    pub fail: bool,
}

impl FakeModem {
    pub fn new(log: &ScriptedChannel) -> Self {
        Self {
            log: log.clone(),
            supported_modes: Vec::new(),
            fail: false,
        }
    }

    fn call(&self, operation: &str) -> Result<(), Error> {
        self.log.note(&std::format!("parent:{}", operation));
        if self.fail {
            Err(Error::rejected("ERROR"))
        } else {
            Ok(())
        }
    }
}

impl GenericModem for FakeModem {
    async fn enable_unsolicited_events(&mut self) -> Result<(), Error> {
        self.call("enable_unsolicited_events")
    }

    async fn disable_unsolicited_events(&mut self) -> Result<(), Error> {
        self.call("disable_unsolicited_events")
    }

    async fn load_supported_modes(&mut self) -> Result<SupportedModes, Error> {
        self.call("load_supported_modes")?;
        Ok(self.supported_modes.iter().copied().take(8).collect())
    }

    async fn set_initial_eps_bearer_settings(&mut self, apn: &str) -> Result<(), Error> {
        self.call(&std::format!("set_initial_eps_bearer_settings({})", apn))
    }
}
