//! The process-wide minimum level, observed through a real `log` backend.

use log::LevelFilter;
use loggable::{
    DirectiveRegistry, Interceptor, LogLevel, LogSink, Loggable, MethodSignature, OperationError,
    args, failure, kinds, min_level, set_min_level,
};
use loggable_console::testing::TestConsole;

const SVC: &str = "app::Service";

fn sig(name: &'static str) -> MethodSignature {
    MethodSignature::new(SVC, name)
}

// One test per binary: the installed logger and the minimum level are global.
#[test]
fn process_minimum_level_gates_every_directive() {
    // A minimum published before the backend is installed survives it.
    set_min_level(LogLevel::Warn);
    let tc = TestConsole::new();
    tc.install_global(LevelFilter::Trace).unwrap();
    assert_eq!(min_level(), LogLevel::Warn);

    let registry = DirectiveRegistry::new()
        .with_method(SVC, "withInfo", Loggable::at(LogLevel::Info).log_on_entry())
        .with_method(SVC, "withError", Loggable::at(LogLevel::Error))
        .with_method(SVC, "withFatal", Loggable::at(LogLevel::Fatal))
        .with_method(SVC, "withThrow", Loggable::at(LogLevel::Info));
    let interceptor = Interceptor::new(registry, LogSink::new());
    tc.clear();
    interceptor.call(&sig("withInfo"), args![], || ());
    tc.assert_line_count(0);

    // Minimum above the directive level: nothing on any path.
    set_min_level(LogLevel::Error);
    assert_eq!(min_level(), LogLevel::Error);
    tc.clear();
    interceptor.call(&sig("withInfo"), args![], || ());
    let result = interceptor.invoke(&sig("withThrow"), args![], || -> Result<(), OperationError> {
        Err(failure!(kinds::FAILURE, "hidden"))
    });
    assert!(result.is_err());
    tc.assert_line_count(0);

    // Error and Fatal directives both land on the facade's error tier.
    interceptor.call(&sig("withError"), args![], || ());
    interceptor.call(&sig("withFatal"), args![], || ());
    let out = tc.output();
    assert_eq!(out.len(), 2, "{out:?}");
    assert!(out[0].starts_with("ERROR app::Service - #withError([]): NULL in "));
    assert!(out[1].starts_with("ERROR app::Service - #withFatal([]): NULL in "));

    // Fatal stays above Error even though both share the facade's error tier.
    tc.clear();
    set_min_level(LogLevel::Fatal);
    assert_eq!(min_level(), LogLevel::Fatal);
    interceptor.call(&sig("withError"), args![], || ());
    tc.assert_line_count(0);
    interceptor.call(&sig("withFatal"), args![], || ());
    let out = tc.output();
    assert_eq!(out.len(), 1, "{out:?}");
    assert!(out[0].starts_with("ERROR app::Service - #withFatal([]): NULL in "));

    // Off silences even the highest directive.
    tc.clear();
    set_min_level(LogLevel::Off);
    assert_eq!(min_level(), LogLevel::Off);
    interceptor.call(&sig("withFatal"), args![], || ());
    tc.assert_line_count(0);

    // Lowering the minimum re-enables info directives, entry message first.
    set_min_level(LogLevel::Info);
    interceptor.call(&sig("withInfo"), args![], || ());
    let out = tc.output();
    assert_eq!(out.len(), 2, "{out:?}");
    assert_eq!(out[0], "INFO app::Service - #withInfo([]): entered");
    assert!(out[1].starts_with("INFO app::Service - #withInfo([]): NULL in "));

    // A sink's own minimum applies on top of the process minimum.
    tc.clear();
    let strict = Interceptor::new(
        DirectiveRegistry::new().with_type(SVC, Loggable::new()),
        LogSink::with_min_level(LogLevel::Warn),
    );
    strict.call(&sig("anything"), args![], || ());
    tc.assert_line_count(0);
}
