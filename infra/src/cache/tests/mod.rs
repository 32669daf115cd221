mod local_code_cache_tests;
