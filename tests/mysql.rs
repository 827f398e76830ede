//! MySQL backends against a throwaway server container.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rstest::rstest;
use testcontainers::runners::SyncRunner;
use testcontainers_modules::mysql::Mysql;

use databench::backend::BackendKind;
use databench::conf::{Config, MySqlConfig};
use databench::generator::{Generator, RandomGenerator, SameKeyGenerator};

#[rstest]
#[case::upsert(BackendKind::MySql, "MySQL")]
#[case::replace(BackendKind::MySqlReplace, "MySQL REPLACE")]
#[ignore = "requires docker"]
fn test_mysql_lifecycle(#[case] kind: BackendKind, #[case] name: &str) {
    let container = Mysql::default().start().unwrap();
    let config = Config {
        mysql: MySqlConfig {
            host: container.get_host().unwrap().to_string(),
            port: container.get_host_port_ipv4(3306).unwrap(),
            database: "bench".to_string(),
            user: Some("root".to_string()),
            pass: Some(String::new()),
            ..MySqlConfig::default()
        },
        ..Config::default()
    };
    let mut rng = StdRng::seed_from_u64(5);
    let baseline = RandomGenerator.generate(50, &mut rng).unwrap();

    let mut backend = kind.build(&config).unwrap();
    assert_eq!(backend.name(), name);
    backend.setup(&baseline).unwrap();
    assert_eq!(backend.count().unwrap(), 50);

    let mut generator = SameKeyGenerator::new();
    for _ in 0..2 {
        let batch = generator.generate(10, &mut rng).unwrap();
        backend.store(&batch).unwrap();
        assert!(backend.query(&batch[9]).unwrap());
        assert_eq!(backend.count().unwrap(), 60);
    }

    let unknown = RandomGenerator.generate(1, &mut rng).unwrap();
    assert!(!backend.query(&unknown[0]).unwrap());

    backend.cleanup().unwrap();
}
