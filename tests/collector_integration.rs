//! Collector 통합 테스트
//!
//! wiremock을 사용한 HTTP 모킹 테스트

use std::sync::Arc;
use std::time::{Duration, Instant};

use hbase_exporter::collector::{
    Collector, JmxClient, JvmCollector, MasterServerCollector, RegionCollector,
    RegionServerCollector, REGION_QUERY,
};
use hbase_exporter::metrics::Sample;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JVM_QUERY: &str = "Hadoop:service=HBase,name=JvmMetrics";

fn client(server: &MockServer, timeout_ms: u64) -> JmxClient {
    JmxClient::new(&format!("{}/jmx", server.uri()), timeout_ms).unwrap()
}

fn find<'a>(samples: &'a [Sample], name: &str) -> Option<&'a Sample> {
    samples.iter().find(|s| s.desc.name() == name)
}

fn value(samples: &[Sample], name: &str) -> f64 {
    find(samples, name)
        .unwrap_or_else(|| panic!("missing sample {}", name))
        .value
}

async fn mount_jvm(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/jmx"))
        .and(query_param("qry", JVM_QUERY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "beans": [{
                "name": "Hadoop:service=HBase,name=JvmMetrics",
                "tag.Hostname": "rs1.example.com",
                "tag.ProcessName": "RegionServer",
                "MemNonHeapUsedM": 85.5,
                "MemHeapUsedM": 1024.25,
                "MemHeapMaxM": 4096.0,
                "MemMaxM": 4096.0,
                "GcCount": 12,
                "GcTimeMillis": 340,
                "ThreadsBlocked": 2
            }]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_jvm_collect_success() {
    let server = MockServer::start().await;
    mount_jvm(&server).await;

    let collector = JvmCollector::new(client(&server, 5000));
    let samples = collector.collect(&CancellationToken::new()).await;

    assert_eq!(samples.len(), 7 + 3);
    assert_eq!(value(&samples, "hbase_jvm_mem_heap_used_m"), 1024.25);
    assert_eq!(value(&samples, "hbase_jvm_gc_count"), 12.0);
    assert_eq!(value(&samples, "hbase_jvm_thread_blocked"), 2.0);
    assert_eq!(value(&samples, "hbase_jvm_up"), 1.0);
    assert_eq!(value(&samples, "hbase_jvm_total_scrapes"), 1.0);

    let heap = find(&samples, "hbase_jvm_mem_heap_max_m").unwrap();
    assert_eq!(heap.label("host"), Some("rs1.example.com"));
    assert_eq!(heap.label("role"), Some("regionserver"));
}

#[tokio::test]
async fn test_master_collect_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jmx"))
        .and(query_param("qry", "Hadoop:service=HBase,name=Master,sub=Server"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "beans": [{
                "tag.Hostname": "hmaster",
                "tag.Context": "Master",
                "tag.isActiveMaster": "true",
                "averageLoad": 3.5,
                "numRegionServers": 4,
                "numDeadRegionServers": 1
            }]
        })))
        .mount(&server)
        .await;

    let collector = MasterServerCollector::new(client(&server, 5000));
    let samples = collector.collect(&CancellationToken::new()).await;

    assert_eq!(value(&samples, "hbase_server_average_load"), 3.5);
    assert_eq!(value(&samples, "hbase_server_num_regionservers"), 4.0);
    assert_eq!(value(&samples, "hbase_server_num_dead_regionserver"), 1.0);
    assert_eq!(value(&samples, "hbase_server_is_active_master"), 1.0);
    assert_eq!(
        find(&samples, "hbase_server_average_load").unwrap().label("role"),
        Some("master")
    );
}

#[tokio::test]
async fn test_regionserver_missing_fields_default_to_zero() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jmx"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "beans": [{
                "tag.Hostname": "rs1",
                "tag.Context": "regionserver",
                "regionCount": 17,
                "storeFileSize": "2048"
            }]
        })))
        .mount(&server)
        .await;

    let collector = RegionServerCollector::new(client(&server, 5000));
    let samples = collector.collect(&CancellationToken::new()).await;

    assert_eq!(value(&samples, "hbase_server_up"), 1.0);
    assert_eq!(value(&samples, "hbase_server_region_count"), 17.0);
    assert_eq!(value(&samples, "hbase_server_store_file_size"), 2048.0);
    assert_eq!(value(&samples, "hbase_server_flush_queue_length"), 0.0);
}

#[tokio::test]
async fn test_http_error_reports_down() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let collector = JvmCollector::new(client(&server, 5000));
    let samples = collector.collect(&CancellationToken::new()).await;

    // only the bookkeeping families
    assert_eq!(samples.len(), 3);
    assert_eq!(value(&samples, "hbase_jvm_up"), 0.0);
    assert_eq!(value(&samples, "hbase_jvm_total_scrapes"), 1.0);
    assert_eq!(value(&samples, "hbase_jvm_json_parse_failures"), 0.0);
}

#[tokio::test]
async fn test_malformed_body_then_recovery() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    mount_jvm(&server).await;

    let collector = JvmCollector::new(client(&server, 5000));

    let first = collector.collect(&CancellationToken::new()).await;
    assert_eq!(first.len(), 3);
    assert_eq!(value(&first, "hbase_jvm_up"), 0.0);
    assert_eq!(value(&first, "hbase_jvm_json_parse_failures"), 1.0);

    let second = collector.collect(&CancellationToken::new()).await;
    assert_eq!(second.len(), 10);
    assert_eq!(value(&second, "hbase_jvm_up"), 1.0);
    assert_eq!(value(&second, "hbase_jvm_total_scrapes"), 2.0);
    assert_eq!(value(&second, "hbase_jvm_json_parse_failures"), 1.0);
}

#[tokio::test]
async fn test_empty_beans_counts_as_parse_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "beans": [] })))
        .mount(&server)
        .await;

    let collector = JvmCollector::new(client(&server, 5000));
    let samples = collector.collect(&CancellationToken::new()).await;

    assert_eq!(samples.len(), 3);
    assert_eq!(value(&samples, "hbase_jvm_up"), 0.0);
    assert_eq!(collector.status().parse_failures(), 1);
}

#[tokio::test]
async fn test_region_collect_emits_one_sample_per_recognized_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/jmx"))
        .and(query_param("qry", REGION_QUERY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "beans": [{
                "name": REGION_QUERY,
                "tag.Hostname": "rs1",
                "tag.Context": "regionserver",
                "Namespace_default_table_usertable_region_abc123_metric_storeCount": 3,
                "Namespace_default_table_usertable_region_abc123_metric_readRequestCount": 1500,
                "Namespace_ns1_table_events_region_def456_metric_storeCount": 1,
                "Namespace_ns1_table_events_region_def456_metric_memStoreSize": 65536,
                "Namespace_ns1_table_events_region_def456_metric_maxStoreFileAge": 99,
                "numRegions": 2
            }]
        })))
        .mount(&server)
        .await;

    let collector = RegionCollector::new(client(&server, 5000));
    let samples = collector.collect(&CancellationToken::new()).await;

    let regions: Vec<&Sample> = samples
        .iter()
        .filter(|s| s.desc.name().starts_with("hbase_region_") && !s.label_values.is_empty())
        .collect();
    assert_eq!(regions.len(), 4);
    // 4 recognized entries plus up/total/failures; the unrecognized one adds nothing
    assert_eq!(samples.len(), 4 + 3);

    let read = find(&samples, "hbase_region_read_request_count").unwrap();
    assert_eq!(read.value, 1500.0);
    assert_eq!(read.label("namespace"), Some("default"));
    assert_eq!(read.label("htable"), Some("usertable"));
    assert_eq!(read.label("hregion"), Some("abc123"));

    let mem = find(&samples, "hbase_region_mem_store_size").unwrap();
    assert_eq!(mem.label("namespace"), Some("ns1"));
    assert_eq!(mem.label("htable"), Some("events"));

    assert_eq!(value(&samples, "hbase_region_up"), 1.0);
}

#[tokio::test]
async fn test_region_malformed_key_is_skipped() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "beans": [{
                "tag.Hostname": "rs1",
                "tag.Context": "regionserver",
                "Namespace_default_table_t1_metric_storeCount": 5,
                "Namespace_default_table_t1_region_r1_metric_storeCount": 7
            }]
        })))
        .mount(&server)
        .await;

    let collector = RegionCollector::new(client(&server, 5000));
    let samples = collector.collect(&CancellationToken::new()).await;

    let stores: Vec<&Sample> = samples
        .iter()
        .filter(|s| s.desc.name() == "hbase_region_store_count")
        .collect();
    assert_eq!(stores.len(), 1);
    assert_eq!(stores[0].value, 7.0);
    assert_eq!(value(&samples, "hbase_region_up"), 1.0);
}

#[tokio::test]
async fn test_region_http_error_then_recovery() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("qry", REGION_QUERY))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "beans": [{
                "tag.Hostname": "rs1",
                "tag.Context": "regionserver",
                "Namespace_default_table_t1_region_r1_metric_storeCount": 3
            }]
        })))
        .mount(&server)
        .await;

    let collector = RegionCollector::new(client(&server, 5000));

    let first = collector.collect(&CancellationToken::new()).await;
    let names: Vec<&str> = first.iter().map(|s| s.desc.name()).collect();
    assert_eq!(
        names,
        vec![
            "hbase_region_up",
            "hbase_region_total_scrapes",
            "hbase_region_json_parse_failures"
        ]
    );
    assert_eq!(value(&first, "hbase_region_up"), 0.0);
    assert_eq!(value(&first, "hbase_region_total_scrapes"), 1.0);
    assert_eq!(value(&first, "hbase_region_json_parse_failures"), 0.0);

    let second = collector.collect(&CancellationToken::new()).await;
    assert_eq!(second.len(), 1 + 3);
    assert_eq!(value(&second, "hbase_region_up"), 1.0);
    assert_eq!(value(&second, "hbase_region_total_scrapes"), 2.0);
    assert_eq!(value(&second, "hbase_region_store_count"), 3.0);
}

#[tokio::test]
async fn test_overlapping_cycles_are_serialized() {
    let server = MockServer::start().await;
    let delay = Duration::from_millis(300);

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "beans": [{
                        "tag.Hostname": "rs1",
                        "tag.Context": "regionserver",
                        "Namespace_default_table_t1_region_r1_metric_storeCount": 1
                    }]
                }))
                .set_delay(delay),
        )
        .expect(2)
        .mount(&server)
        .await;

    let collector = Arc::new(RegionCollector::new(client(&server, 5000)));
    let cancel = CancellationToken::new();

    let start = Instant::now();
    let (a, b) = tokio::join!(collector.collect(&cancel), collector.collect(&cancel));

    assert!(start.elapsed() >= delay * 2);
    for samples in [&a, &b] {
        let stores: Vec<&Sample> = samples
            .iter()
            .filter(|s| s.desc.name() == "hbase_region_store_count")
            .collect();
        assert_eq!(stores.len(), 1);
    }
    assert_eq!(collector.status().total_scrapes(), 2);
}

#[tokio::test]
async fn test_timeout_reports_down() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let collector = JvmCollector::new(client(&server, 100));

    let start = Instant::now();
    let samples = collector.collect(&CancellationToken::new()).await;

    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(samples.len(), 3);
    assert_eq!(value(&samples, "hbase_jvm_up"), 0.0);
    assert_eq!(value(&samples, "hbase_jvm_json_parse_failures"), 0.0);
}

#[tokio::test]
async fn test_cancelled_cycle_reports_down() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(10)))
        .mount(&server)
        .await;

    let collector = JvmCollector::new(client(&server, 30_000));
    let cancel = CancellationToken::new();

    let trigger = cancel.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        trigger.cancel();
    });

    let start = Instant::now();
    let samples = collector.collect(&cancel).await;

    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(value(&samples, "hbase_jvm_up"), 0.0);
}
