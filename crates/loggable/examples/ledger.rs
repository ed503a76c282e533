//! A small ledger whose public methods are logged through an interceptor.
//!
//! Run with `LOGGABLE_LOG=debug` to see the entry messages, or with
//! `LOGGABLE_CONFIG=ledger.toml` to drive the directives from a file.

use loggable::{
    DirectiveRegistry, FailureKind, Interceptor, LogLevel, LogSink, Loggable, LoggableConfig,
    MethodSignature, OperationError, args, failure, kinds,
};
use loggable_console::ConsoleConfig;

static LEDGER_ERROR: FailureKind = FailureKind::extends("ledger::Error", &kinds::FAILURE);
static INSUFFICIENT_FUNDS: FailureKind =
    FailureKind::extends("ledger::InsufficientFunds", &LEDGER_ERROR);

struct Ledger {
    balance: i64,
    interceptor: Interceptor,
}

impl Ledger {
    fn new(interceptor: Interceptor) -> Self {
        Self {
            balance: 0,
            interceptor,
        }
    }

    fn sig(name: &'static str) -> MethodSignature {
        MethodSignature::of::<Self>(name)
    }

    pub fn deposit(&mut self, amount: i64) -> Result<i64, OperationError> {
        let interceptor = self.interceptor.clone();
        interceptor.invoke(&Self::sig("deposit"), args![amount], || {
            if amount <= 0 {
                return Err(failure!(kinds::INVALID_INPUT, "deposit of {} is not positive", amount));
            }
            self.balance += amount;
            Ok(self.balance)
        })
    }

    pub fn withdraw(&mut self, amount: i64) -> Result<i64, OperationError> {
        let interceptor = self.interceptor.clone();
        interceptor.invoke(&Self::sig("withdraw"), args![amount], || {
            if amount > self.balance {
                return Err(failure!(
                    INSUFFICIENT_FUNDS,
                    "balance {} is below {}",
                    self.balance,
                    amount
                ));
            }
            self.balance -= amount;
            Ok(self.balance)
        })
    }

    pub fn balance(&self) -> i64 {
        self.interceptor
            .call(&Self::sig("balance"), args![], || self.balance)
    }

    pub fn statement(&self, pin: &str) -> String {
        self.interceptor.call(&Self::sig("statement"), args![pin], || {
            format!("balance: {}", self.balance)
        })
    }
}

fn registry() -> DirectiveRegistry {
    let mut registry = DirectiveRegistry::new();
    registry.annotate_type_of::<Ledger>(Loggable::new());
    registry.annotate_method_of::<Ledger>(
        "withdraw",
        Loggable::at(LogLevel::Debug)
            .log_on_entry()
            .ignore(&LEDGER_ERROR),
    );
    registry.annotate_method_of::<Ledger>("statement", Loggable::new().skip_args().skip_result());
    registry
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    ConsoleConfig::from_env().init()?;

    let config = LoggableConfig::from_env()?;
    config.apply();
    let interceptor = if config.directives.is_empty() {
        Interceptor::builder()
            .registry(registry())
            .formats(config.formats.clone())
            .sink(LogSink::new())
            .build()
    } else {
        config.interceptor(LogSink::new())
    };

    let mut ledger = Ledger::new(interceptor);
    ledger.deposit(100)?;
    let _ = ledger.deposit(-5);
    let _ = ledger.withdraw(500);
    ledger.withdraw(40)?;
    ledger.balance();
    ledger.statement("1234");
    Ok(())
}
